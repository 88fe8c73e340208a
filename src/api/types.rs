//! Shared types for the WASM API
//!
//! This module contains common result types used across multiple API modules.

use serde::{Deserialize, Serialize};

use crate::placement::InsertOutcome;
use crate::store::{PlacementSnapshot, PlannerStore};

/// Result of an edit operation (mutation primitive)
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    /// False when the edit was a guarded no-op
    pub changed: bool,
    /// Present for slot insertions
    pub outcome: Option<InsertOutcome>,
    /// Id assigned by an add operation
    pub created_id: Option<String>,
    pub placement: PlacementSnapshot,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl EditResult {
    pub fn from_store(store: &PlannerStore, changed: bool) -> Self {
        Self {
            changed,
            outcome: None,
            created_id: None,
            placement: store.snapshot(),
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
        }
    }

    pub fn with_outcome(mut self, outcome: InsertOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_created_id(mut self, id: String) -> Self {
        self.created_id = Some(id);
        self
    }
}

/// Ownership flags after a toggle
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub key: String,
    pub value: bool,
    pub owned_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Collection, Container, PlannerSettings, Segment};

    #[test]
    fn test_edit_result_shape() {
        let mut collection = Collection::new();
        collection.add_container(Container::unbounded("box", "Box")).unwrap();
        collection
            .add_segment(Segment::new("s", "Set", "SET").with_cards(["a"]))
            .unwrap();
        let store = PlannerStore::with_collection(collection, PlannerSettings::default()).unwrap();

        let result = EditResult::from_store(&store, true).with_outcome(InsertOutcome::NoOwningSegment);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["changed"], true);
        assert_eq!(json["canUndo"], false);
        assert_eq!(json["outcome"]["kind"], "noOwningSegment");
        assert_eq!(json["placement"]["totalCards"], 1);
        assert!(json["createdId"].is_null());

        let json = serde_json::to_value(EditResult::from_store(&store, true).with_created_id("box".to_string())).unwrap();
        assert_eq!(json["createdId"], "box");
    }
}
