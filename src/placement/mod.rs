//! Placement of segments into containers
//!
//! - `engine`: the single-pass fill that assigns every card a slot or overflow
//! - `reflow`: slot-level insert/remove edits that feed back into the engine

pub mod engine;
pub mod reflow;

pub use engine::{compute_placement, place, ContainerUsage, OverflowRecord, Placement, PlacementResult};
pub use reflow::{insert_card_at_slot, remove_card_at_slot, resolve_insertion, InsertOutcome, InsertionPoint};
