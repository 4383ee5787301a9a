//! Internal notification channel.
//!
//! An explicit mapping from event name (= state name) to an ordered list
//! of handler closures, each carrying a fire-once flag. Owned exclusively
//! by one machine instance; nothing here is shared across machines.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Payload delivered to handlers when a transition lands on their event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// The state the machine arrived at (the event name).
    pub state: String,
    /// The state the machine left.
    pub previous: String,
    /// Extra arguments passed through `next_with`, untouched.
    pub args: Vec<Value>,
}

/// Opaque handle identifying one registration.
///
/// Closures have no identity of their own, so deregistration goes
/// through the handle returned by `on`/`once`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A registered handler. `Ctx` is the value handed back to the handler
/// on dispatch, which is how a handler can drive the machine that is
/// notifying it.
pub(crate) type Handler<Ctx> = Rc<RefCell<dyn FnMut(&mut Ctx, &TransitionEvent)>>;

struct Registration<Ctx> {
    id: HandlerId,
    once: bool,
    handler: Handler<Ctx>,
}

/// Event-name → ordered handler list.
pub(crate) struct Emitter<Ctx> {
    handlers: HashMap<String, Vec<Registration<Ctx>>>,
}

impl<Ctx> Emitter<Ctx> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler fired on every arrival at `event`.
    pub(crate) fn on<F>(&mut self, event: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut Ctx, &TransitionEvent) + 'static,
    {
        self.register(event, handler, false)
    }

    /// Register a handler fired at most once, then dropped.
    pub(crate) fn once<F>(&mut self, event: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut Ctx, &TransitionEvent) + 'static,
    {
        self.register(event, handler, true)
    }

    /// Deregister a specific handler. Returns whether anything was removed.
    pub(crate) fn off(&mut self, event: &str, id: HandlerId) -> bool {
        let Some(regs) = self.handlers.get_mut(event) else {
            return false;
        };
        let before = regs.len();
        regs.retain(|reg| reg.id != id);
        let removed = regs.len() != before;
        if regs.is_empty() {
            self.handlers.remove(event);
        }
        removed
    }

    pub(crate) fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    /// Take the handlers to fire for one arrival at `event`, in
    /// registration order.
    ///
    /// Fire-once registrations are removed from the registry before the
    /// caller invokes anything, so a nested arrival at the same event
    /// cannot re-fire them. Handlers registered during dispatch are not
    /// in the returned snapshot and fire on the next arrival.
    pub(crate) fn snapshot(&mut self, event: &str) -> Vec<Handler<Ctx>> {
        let Some(regs) = self.handlers.get_mut(event) else {
            return Vec::new();
        };
        let fired = regs.iter().map(|reg| Rc::clone(&reg.handler)).collect();
        regs.retain(|reg| !reg.once);
        if regs.is_empty() {
            self.handlers.remove(event);
        }
        fired
    }

    fn register<F>(&mut self, event: &str, handler: F, once: bool) -> HandlerId
    where
        F: FnMut(&mut Ctx, &TransitionEvent) + 'static,
    {
        let id = HandlerId::new();
        let handler: Handler<Ctx> = Rc::new(RefCell::new(handler));
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(Registration { id, once, handler });
        id
    }
}

impl<Ctx> Default for Emitter<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> fmt::Debug for Emitter<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("events", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
