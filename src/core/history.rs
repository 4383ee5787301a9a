//! State transition history tracking.
//!
//! Immutable record of the states a machine has moved through, kept
//! alongside the live `current`/`previous` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single successful transition.
///
/// Transitions only ever happen from a registered state, so `from` is
/// always a concrete state name even on machines constructed with a
/// null start (those cannot transition at all).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being transitioned from.
    pub from: String,
    /// The state being transitioned to.
    pub to: String,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions.
///
/// History is immutable — [`record`](StateHistory::record) returns a new
/// history with the transition appended.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use statemap::{StateHistory, TransitionRecord};
///
/// let history = StateHistory::new();
/// let history = history.record(TransitionRecord {
///     from: "INIT".to_string(),
///     to: "ACTION".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), ["INIT", "ACTION"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed: the first `from`, then the
    /// `to` of each transition in order.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Total duration from first to last transition, `None` while the
    /// history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }
}
