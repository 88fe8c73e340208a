//! Render-ready views of a placement result

use serde::{Deserialize, Serialize};

use std::collections::HashMap;

use crate::models::{CardLookup, CardRecord, Collection};
use crate::placement::{ContainerUsage, OverflowRecord, Placement, PlacementResult};

/// A placement decorated with ownership flags and card data
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    #[serde(flatten)]
    pub placement: Placement,
    /// Ownership key (`segmentId:position`)
    pub key: String,
    pub owned: bool,
    pub skipped: bool,
    pub card: Option<CardRecord>,
}

/// Everything the rendering layer needs after a recompute
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSnapshot {
    pub placements: Vec<PlacementView>,
    pub overflow: Vec<OverflowRecord>,
    pub usage: Vec<ContainerUsage>,
    pub total_cards: usize,
    pub total_capacity: usize,
    pub unresolved_cards: usize,
    /// Placed cards flagged as owned
    pub owned_cards: usize,
}

impl PlacementSnapshot {
    /// Join placements with ownership flags and, given a lookup, card records
    pub fn build(result: &PlacementResult, collection: &Collection, lookup: Option<&dyn CardLookup>) -> Self {
        let records: HashMap<String, CardRecord> = match lookup {
            Some(lookup) => {
                let ids: Vec<String> = result.placements.iter().map(|p| p.card_id.clone()).collect();
                lookup.resolve_cards(&ids)
            }
            None => HashMap::new(),
        };

        let placements: Vec<PlacementView> = result
            .placements
            .iter()
            .map(|placement| {
                let key = placement.ownership_key();
                PlacementView {
                    owned: collection.ownership.is_owned(&key),
                    skipped: collection.ownership.is_skipped(&key),
                    key: key.to_string(),
                    card: records.get(&placement.card_id).cloned(),
                    placement: placement.clone(),
                }
            })
            .collect();

        Self {
            owned_cards: placements.iter().filter(|p| p.owned).count(),
            placements,
            overflow: result.overflow.clone(),
            usage: result.usage.clone(),
            total_cards: result.total_cards,
            total_capacity: result.total_capacity,
            unresolved_cards: result.unresolved_cards,
        }
    }
}
