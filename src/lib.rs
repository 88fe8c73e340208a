//! Binder Planner WASM Module
//!
//! Plans where every card of a collection lands in physical binders and
//! boxes. Placement is a pure function of segments and containers; the
//! store layered on top applies edits, keeps ownership stable across
//! reflow and records undo history.

pub mod models;
pub mod placement;
pub mod store;
pub mod undo;
pub mod api;

// Re-export commonly used types
pub use models::*;
pub use placement::{compute_placement, place, InsertOutcome, Placement, PlacementResult};
pub use store::{PlacementSnapshot, PlannerStore};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        crate::wasm_warn!("Logger already initialized");
    }

    log::info!("Binder planner WASM module initialized");
}
