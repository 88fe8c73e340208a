//! Error types for planner operations
//!
//! Capacity exhaustion and out-of-range spacer edits are not errors (they are
//! reported as overflow or treated as no-ops). These variants cover lookups and
//! validation at the store boundary.

use thiserror::Error;

/// Errors raised by collection, store and persistence operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// An entity with the same id already exists in the collection
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Bounded container invariant violated (page count or slots per page)
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Offset {offset} out of range (must be 0-{max})")]
    OffsetOutOfRange { offset: u32, max: u32 },

    #[error("Invalid ownership key: '{0}'")]
    InvalidOwnershipKey(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("No undo history available")]
    NothingToUndo,

    #[error("No redo history available")]
    NothingToRedo,
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Serialization(err.to_string())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
