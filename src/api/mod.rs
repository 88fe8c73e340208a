//! Binder Planner WASM API
//!
//! This module provides the JavaScript-facing API for the binder planner.
//! The planner store lives in WASM memory; JavaScript sends edits and
//! receives fresh placement snapshots back.
//!
//! # Module Structure
//!
//! - `helpers`: Serialization, error conversion and `[WASM]` console logging
//! - `types`: Result shapes shared by the edit functions
//! - `position`: Slot index and page/slot conversions
//! - `core`: Store-backed operations (load, edit, undo/redo, structure)

pub mod helpers;
pub mod types;
pub mod position;
pub mod core;

pub use self::core::*;
pub use position::{container_capacity, location_to_slot_index, slot_index_to_location};
pub use types::{EditResult, ToggleResult};
