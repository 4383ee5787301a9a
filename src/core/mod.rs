//! Core state machine types and logic.
//!
//! This module contains the machine itself and its supporting pieces:
//! - Transition maps and state sets
//! - The machine with its transition algorithm
//! - The internal notification channel
//! - Transition history tracking

mod emitter;
mod history;
mod machine;
mod map;

pub use emitter::{HandlerId, TransitionEvent};
pub use history::{StateHistory, TransitionRecord};
pub use machine::{create_fsm, is_fsm, FiniteStateMachine};
pub use map::{create_set, SharedStateMap, StateSet, TransitionMap};
