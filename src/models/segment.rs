//! Segments and their spacer maps
//!
//! A segment is an ordered checklist of card ids (usually one game set). The
//! spacer map records how many blank pockets sit immediately before a given
//! card position. Every edit to the card sequence renumbers the spacer map in
//! the same step so each blank stays attached to the card it precedes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::serde_helpers::position_map;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Blank when created by the host; the collection assigns one
    #[serde(default)]
    pub id: String,
    pub name: String,

    /// Set code of the checklist this segment was built from
    #[serde(default)]
    pub source_set: String,

    /// Card ids in placement order; duplicates are separate positions
    #[serde(default)]
    pub cards: Vec<String>,

    /// Blank slots reserved before the first card
    #[serde(default)]
    pub offset: u32,

    /// Preferred container, tried before auto-fill
    #[serde(default)]
    pub target_container_id: Option<String>,

    /// Position -> blank slots before that position (never holds zeros)
    #[serde(default, with = "position_map")]
    pub spacers: BTreeMap<usize, u32>,
}

/// Where a card landed after [`Segment::insert_card`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardInsertion {
    pub position: usize,
    /// The new card took over one of the blanks recorded at `position`
    pub consumed_spacer: bool,
}

/// A card taken out by [`Segment::remove_card`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCard {
    pub card_id: String,
    /// Blanks that sat before the removed card and went away with it
    pub spacers: u32,
}

impl Segment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source_set: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_set: source_set.into(),
            cards: Vec::new(),
            offset: 0,
            target_container_id: None,
            spacers: BTreeMap::new(),
        }
    }

    pub fn with_cards<I, S>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cards = cards.into_iter().map(Into::into).collect();
        self.prune_spacers();
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card_at(&self, position: usize) -> Option<&str> {
        self.cards.get(position).map(String::as_str)
    }

    pub fn spacer_count_before(&self, position: usize) -> u32 {
        self.spacers.get(&position).copied().unwrap_or(0)
    }

    /// Add one blank before `position`; returns false when out of range
    pub fn add_spacer(&mut self, position: usize) -> bool {
        if position >= self.cards.len() {
            return false;
        }
        *self.spacers.entry(position).or_insert(0) += 1;
        true
    }

    /// Remove one blank before `position`; returns false when there was none
    pub fn remove_spacer(&mut self, position: usize) -> bool {
        match self.spacers.get_mut(&position) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.spacers.remove(&position);
                true
            }
            None => false,
        }
    }

    /// Insert a card before `before` (or append when `None` or past the end)
    ///
    /// Spacers at or after the insertion point move up one position. A card
    /// inserted where blanks were recorded fills one of them.
    pub fn insert_card(&mut self, card_id: impl Into<String>, before: Option<usize>) -> CardInsertion {
        let position = before.map_or(self.cards.len(), |p| p.min(self.cards.len()));
        self.cards.insert(position, card_id.into());

        let mut consumed_spacer = false;
        let old = std::mem::take(&mut self.spacers);
        for (pos, count) in old {
            if pos < position {
                self.spacers.insert(pos, count);
            } else if pos == position {
                consumed_spacer = true;
                if count > 1 {
                    self.spacers.insert(pos + 1, count - 1);
                }
            } else {
                self.spacers.insert(pos + 1, count);
            }
        }

        CardInsertion { position, consumed_spacer }
    }

    /// Remove the card at `position`
    ///
    /// The blanks recorded before it disappear with it; later spacers move down
    /// one position. Returns `None` when `position` is out of range.
    pub fn remove_card(&mut self, position: usize) -> Option<RemovedCard> {
        if position >= self.cards.len() {
            return None;
        }
        let card_id = self.cards.remove(position);

        let old = std::mem::take(&mut self.spacers);
        let mut spacers = 0;
        for (pos, count) in old {
            if pos < position {
                self.spacers.insert(pos, count);
            } else if pos == position {
                spacers = count;
            } else {
                self.spacers.insert(pos - 1, count);
            }
        }

        Some(RemovedCard { card_id, spacers })
    }

    /// Put back a card taken out by [`Segment::remove_card`], with its blanks
    pub fn restore_card(&mut self, position: usize, card_id: impl Into<String>, spacers: u32) {
        let position = position.min(self.cards.len());
        self.cards.insert(position, card_id.into());

        let old = std::mem::take(&mut self.spacers);
        for (pos, count) in old {
            let pos = if pos >= position { pos + 1 } else { pos };
            self.spacers.insert(pos, count);
        }
        if spacers > 0 {
            self.spacers.insert(position, spacers);
        }
    }

    /// Drop spacer entries that no longer point at a card, and zero counts
    pub fn prune_spacers(&mut self) {
        let len = self.cards.len();
        self.spacers.retain(|&pos, count| pos < len && *count > 0);
    }
}
