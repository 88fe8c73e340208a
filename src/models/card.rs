//! Card records and the lookup contract
//!
//! Card data is fetched and cached by the host (network or browser storage).
//! The planner only needs to know which ids resolved; records are carried
//! through so the rendering layer can show them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub set_code: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Resolves card ids into full records
///
/// Implementations may omit ids they cannot resolve.
pub trait CardLookup {
    fn resolve_cards(&self, ids: &[String]) -> HashMap<String, CardRecord>;

    fn is_resolved(&self, id: &str) -> bool;
}

/// In-memory catalog of already fetched cards
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CardCatalog {
    cards: HashMap<String, CardRecord>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace records; returns how many were new
    pub fn register<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = CardRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.cards.insert(record.id.clone(), record).is_none() {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardLookup for CardCatalog {
    fn resolve_cards(&self, ids: &[String]) -> HashMap<String, CardRecord> {
        ids.iter()
            .filter_map(|id| self.cards.get(id).map(|record| (id.clone(), record.clone())))
            .collect()
    }

    fn is_resolved(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }
}
