//! Error types for plan mutations.

use thiserror::Error;

use crate::model::Slot;

/// Convenience alias for planner results.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors surfaced by the mutation and query surface.
///
/// A failed mutation never partially applies: the plan is left exactly as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("day index {0} is out of range")]
    DayOutOfRange(usize),

    #[error("place '{0}' is not planned")]
    ItemNotFound(String),

    #[error("place '{place_id}' is not in day {day}, {slot}")]
    ItemNotInSlot {
        place_id: String,
        day: usize,
        slot: Slot,
    },

    #[error("order {order} is out of range for a slot of length {len}")]
    OrderOutOfRange { order: usize, len: usize },

    #[error("place '{0}' is already planned")]
    DuplicatePlace(String),

    #[error("item '{0}' is locked")]
    ItemLocked(String),

    #[error("cluster '{0}' not found")]
    ClusterNotFound(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}
