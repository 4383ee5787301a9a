//! Error taxonomy for construction and transitions.

use thiserror::Error;

/// Errors raised by machine construction, `next`, and `create_set`.
///
/// Every error is surfaced synchronously to the caller of the failing
/// operation. Nothing is retried or recovered internally, and a failed
/// `next` call leaves the machine untouched.
#[derive(Debug, Error)]
pub enum FsmError {
    /// A construction or call argument had the wrong shape.
    #[error("{0}")]
    InvalidArgument(String),

    /// The machine's current state is not a key of the transition map.
    ///
    /// Raised lazily on `next`, never at construction: a machine may be
    /// built with an unregistered (or null) start state, and a map
    /// mutation may remove the current state's own key.
    #[error("current state '{state}' does not exist in transition map")]
    UnknownState { state: String },

    /// A transition-map value is not a valid set of state names.
    ///
    /// Guards map integrity rather than machine state: the map is owned
    /// by the caller and may have been mutated since the last transition.
    #[error("transition map entry for '{state}' is not a valid state set")]
    InvalidMapEntry { state: String },

    /// The requested target is not reachable from the current state.
    #[error("next state from '{from}' does not include '{to}'")]
    IllegalTransition { from: String, to: String },
}
