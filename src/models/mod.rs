//! Models module for the binder planner
//!
//! This module contains the data models used by the placement engine:
//! containers, segments with their spacer maps, plans, the ownership ledger
//! and the collection that ties them together.

pub mod card;
pub mod collection;
pub mod container;
pub mod errors;
pub mod ownership;
pub mod plan;
pub mod segment;
pub mod serde_helpers;
pub mod settings;

// Re-export commonly used types
pub use card::{CardCatalog, CardLookup, CardRecord};
pub use collection::{new_id, Collection, CollectionMetadata};
pub use container::{Container, ContainerKind, SlotLocation, UNBOUNDED_CAPACITY, UNBOUNDED_PAGE};
pub use errors::{PlannerError, PlannerResult};
pub use ownership::{OwnershipKey, OwnershipLedger};
pub use plan::Plan;
pub use segment::{CardInsertion, RemovedCard, Segment};
pub use settings::PlannerSettings;
