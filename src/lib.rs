//! Statemap: a minimal event-emitting finite state machine.
//!
//! A machine is driven by a declarative [`TransitionMap`] — state name →
//! set of states reachable in one step — and does three things: it
//! enforces legal state changes, remembers where it has been, and
//! notifies observers when a transition lands on their state.
//!
//! # Core Concepts
//!
//! - **Transition map**: caller-owned, shared by reference; edits made
//!   between transitions take effect immediately
//! - **Lazy validation**: the start state and map entries are checked on
//!   `next`, never eagerly at construction
//! - **Synchronous dispatch**: handlers run on the same call stack as
//!   `next`, in registration order, and may drive nested transitions
//!
//! # Example
//!
//! ```rust
//! use statemap::{create_fsm, create_set, FsmError, TransitionMap};
//!
//! let mut map = TransitionMap::new();
//! map.insert("INIT", create_set(["ACTION"]).unwrap());
//! map.insert("ACTION", create_set(["FINISHED"]).unwrap());
//!
//! let mut fsm = create_fsm(map.shared(), Some("INIT"));
//!
//! fsm.once("ACTION", |_, event| {
//!     println!("arrived at {} from {}", event.state, event.previous);
//! });
//!
//! assert!(fsm.next("ACTION").unwrap());
//! assert_eq!(fsm.state(), Some("ACTION"));
//! assert_eq!(fsm.previous(), Some("INIT"));
//!
//! // ACTION only declares FINISHED as reachable.
//! assert!(matches!(
//!     fsm.next("INIT"),
//!     Err(FsmError::IllegalTransition { .. })
//! ));
//!
//! assert!(fsm.next("FINISHED").unwrap());
//! assert_eq!(fsm.history().get_path(), ["INIT", "ACTION", "FINISHED"]);
//! ```

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used types
pub use config::{MachineConfig, MachineParam};
pub use core::{
    create_fsm, create_set, is_fsm, FiniteStateMachine, HandlerId, SharedStateMap, StateHistory,
    StateSet, TransitionEvent, TransitionMap, TransitionRecord,
};
pub use error::FsmError;
