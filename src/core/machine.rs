//! The finite state machine.

use crate::config::{MachineConfig, MachineParam};
use crate::core::emitter::{Emitter, HandlerId, TransitionEvent};
use crate::core::history::{StateHistory, TransitionRecord};
use crate::core::map::SharedStateMap;
use crate::error::FsmError;
use chrono::Utc;
use serde_json::Value;
use std::any::Any;

/// A finite state machine over a declarative transition map.
///
/// The machine owns its current/previous state, an optional diagnostic
/// identifier, a private notification channel, and a transition
/// history. The transition map stays owned by the caller and is shared
/// by reference; mutations made to it between transitions take effect
/// on the next [`next`](FiniteStateMachine::next) call.
///
/// The machine's behavior is itself a state machine: its states are the
/// map's keys, its transitions exactly the declared edges, and its
/// terminal states any key with an empty set or any state absent as a
/// key. The start state is validated lazily, on the first `next` call,
/// not at construction.
///
/// # Example
///
/// ```rust
/// use statemap::{create_fsm, create_set, FsmError, TransitionMap};
///
/// let mut map = TransitionMap::new();
/// map.insert("INIT", create_set(["ACTION"]).unwrap());
/// map.insert("ACTION", create_set(["FINISHED"]).unwrap());
///
/// let mut fsm = create_fsm(map.shared(), Some("INIT"));
///
/// fsm.on("ACTION", |_, event| {
///     assert_eq!(event.previous, "INIT");
/// });
///
/// assert!(fsm.next("ACTION").unwrap());
/// assert_eq!(fsm.state(), Some("ACTION"));
/// assert_eq!(fsm.previous(), Some("INIT"));
///
/// assert!(matches!(
///     fsm.next("INIT"),
///     Err(FsmError::IllegalTransition { .. })
/// ));
/// ```
#[derive(Debug)]
pub struct FiniteStateMachine {
    current: Option<String>,
    previous: Option<String>,
    id: Option<String>,
    map: SharedStateMap,
    emitter: Emitter<FiniteStateMachine>,
    history: StateHistory,
}

impl FiniteStateMachine {
    /// Create a machine over a shared map, optionally placed at a start
    /// state.
    ///
    /// The start state is not checked against the map here; a machine
    /// built on an unregistered (or null) start simply fails with
    /// [`FsmError::UnknownState`] on its first transition attempt.
    pub fn new(map: SharedStateMap, start: Option<&str>) -> Self {
        Self::with_config(MachineConfig {
            map,
            start: start.map(str::to_string),
            id: None,
        })
    }

    /// Create a machine from a normalized config.
    pub fn with_config(config: MachineConfig) -> Self {
        tracing::debug!(
            id = config.id.as_deref().unwrap_or("-"),
            start = config.start.as_deref().unwrap_or("null"),
            "fsm constructed"
        );
        Self {
            current: config.start,
            previous: None,
            id: config.id,
            map: config.map,
            emitter: Emitter::new(),
            history: StateHistory::new(),
        }
    }

    /// Create a machine from construction parameters given in any
    /// order. See [`MachineConfig::resolve`] for the validation rules.
    pub fn from_params<I>(params: I) -> Result<Self, FsmError>
    where
        I: IntoIterator<Item = MachineParam>,
    {
        Ok(Self::with_config(MachineConfig::resolve(params)?))
    }

    /// The current state, `None` before any transition on a machine
    /// constructed without a start state.
    pub fn state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The state before the most recent successful transition, `None`
    /// until the first one.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// The diagnostic identifier, if one was configured.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The transition history.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// The shared transition map backing this machine.
    pub fn map(&self) -> &SharedStateMap {
        &self.map
    }

    /// Number of handlers currently registered for an event.
    pub fn handler_count(&self, event: &str) -> usize {
        self.emitter.handler_count(event)
    }

    /// Attempt a transition to `target`.
    ///
    /// Checks, in order: `target` is a state name, the current state is
    /// a key of the map, the map entry is a valid state set, and
    /// `target` is a member of that set. On success the state pair is
    /// updated, the transition is recorded, and every handler
    /// registered for `target` fires synchronously in registration
    /// order before this call returns `Ok(true)`. No failure path
    /// mutates the machine or fires a handler.
    pub fn next(&mut self, target: &str) -> Result<bool, FsmError> {
        self.next_with(target, Vec::new())
    }

    /// [`next`](FiniteStateMachine::next), passing extra arguments
    /// through to the handlers untouched.
    pub fn next_with(&mut self, target: &str, args: Vec<Value>) -> Result<bool, FsmError> {
        if target.is_empty() {
            return Err(FsmError::InvalidArgument(
                "state parameter must be a non-empty string".to_string(),
            ));
        }

        // The map borrow must end before dispatch: handlers may mutate
        // the map through their own handle or drive nested transitions.
        let from = {
            let map = self.map.borrow();
            let Some(current) = self.current.as_deref() else {
                return Err(FsmError::UnknownState {
                    state: "null".to_string(),
                });
            };
            let Some(entry) = map.get(current) else {
                return Err(FsmError::UnknownState {
                    state: current.to_string(),
                });
            };
            if !entry.is_valid() {
                return Err(FsmError::InvalidMapEntry {
                    state: current.to_string(),
                });
            }
            if !entry.contains(target) {
                return Err(FsmError::IllegalTransition {
                    from: current.to_string(),
                    to: target.to_string(),
                });
            }
            current.to_string()
        };

        self.previous = Some(from.clone());
        self.current = Some(target.to_string());
        self.history = self.history.record(TransitionRecord {
            from: from.clone(),
            to: target.to_string(),
            timestamp: Utc::now(),
        });
        tracing::debug!(
            id = self.id.as_deref().unwrap_or("-"),
            from = %from,
            to = %target,
            "transition"
        );

        let event = TransitionEvent {
            state: target.to_string(),
            previous: from,
            args,
        };
        for handler in self.emitter.snapshot(target) {
            // A handler re-entered through its own event (via nested
            // transitions) is still running; skip the re-entrant
            // invocation rather than recursing into it.
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(self, &event);
            }
        }

        Ok(true)
    }

    /// Register a handler invoked every time a transition lands on
    /// `event`. Handlers receive the machine itself and may call `next`
    /// on it; the nested transition completes before the outer dispatch
    /// loop resumes. A handler is never re-entered through its own
    /// event: a nested arrival there skips the in-flight handler and
    /// fires the others.
    pub fn on<F>(&mut self, event: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut FiniteStateMachine, &TransitionEvent) + 'static,
    {
        self.emitter.on(event, handler)
    }

    /// Register a handler invoked at most once, then deregistered. The
    /// registration is removed before the handler runs, so a nested
    /// arrival at the same event cannot re-fire it.
    pub fn once<F>(&mut self, event: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut FiniteStateMachine, &TransitionEvent) + 'static,
    {
        self.emitter.once(event, handler)
    }

    /// Deregister a specific handler. Returns whether it was found.
    pub fn off(&mut self, event: &str, handler: HandlerId) -> bool {
        self.emitter.off(event, handler)
    }
}

/// Create a finite state machine. Free-function spelling of
/// [`FiniteStateMachine::new`].
pub fn create_fsm(map: SharedStateMap, start: Option<&str>) -> FiniteStateMachine {
    FiniteStateMachine::new(map, start)
}

/// Check whether a value is a [`FiniteStateMachine`].
///
/// ```rust
/// use statemap::{create_fsm, is_fsm, TransitionMap};
///
/// let fsm = create_fsm(TransitionMap::new().shared(), None);
/// assert!(is_fsm(&fsm));
/// assert!(!is_fsm(&TransitionMap::new()));
/// assert!(!is_fsm(&"INIT"));
/// ```
pub fn is_fsm(value: &dyn Any) -> bool {
    value.is::<FiniteStateMachine>()
}
