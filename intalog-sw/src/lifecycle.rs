//! Worker Lifecycle
//!
//! State machine for the worker's lifecycle. The host guarantees install
//! completes before activation begins, and activation completes before the
//! worker intercepts fetches; the transition matrix enforces that ordering
//! on this side of the contract.

use crate::WorkerError;

/// Worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Script parsed, no event dispatched yet
    Parsed,
    /// Install event fired
    Installing,
    /// Installed, ready to activate
    Installed,
    /// Activate event fired
    Activating,
    /// Active and controlling pages
    Activated,
    /// Failed or replaced
    Redundant,
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::Parsed
    }
}

/// Check if a state transition is valid.
pub fn is_valid_transition(from: WorkerState, to: WorkerState) -> bool {
    use WorkerState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installing, Redundant)   // install failed
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant)   // activate failed
            | (Activated, Redundant)    // replaced by a newer version
    )
}

/// Validate and return the new state.
pub fn advance(from: WorkerState, to: WorkerState) -> Result<WorkerState, WorkerError> {
    if is_valid_transition(from, to) {
        Ok(to)
    } else {
        Err(WorkerError::InvalidStateTransition)
    }
}
