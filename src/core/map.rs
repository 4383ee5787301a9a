//! Transition maps and state sets.
//!
//! A [`TransitionMap`] maps a state name to the [`StateSet`] of states
//! reachable from it in one step. The map is owned by the caller and
//! shared with machines by reference (see [`SharedStateMap`]); machines
//! never copy or mutate it, so edits made between transitions take
//! effect on the next `next` call.

use crate::error::FsmError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// Set of state names reachable from a given state.
///
/// A set is *valid* when every member is a non-empty state name.
/// [`create_set`] only builds valid sets, but the set API is fully
/// exposed through `Deref`, so a caller can push invalid content into a
/// live map; `next` checks validity lazily and fails with
/// [`FsmError::InvalidMapEntry`] when it encounters a bad entry.
///
/// # Example
///
/// ```rust
/// use statemap::create_set;
///
/// let set = create_set(["a", "a", "b"]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("a"));
/// assert!(set.contains("b"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(HashSet<String>);

impl StateSet {
    /// Create an empty state set.
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Check that every member is a non-empty state name.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|state| !state.is_empty())
    }
}

impl Deref for StateSet {
    type Target = HashSet<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StateSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<String> for StateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Declarative transition map: state name → reachable state set.
///
/// An absent key means "unknown state" (any transition attempt from it
/// fails with [`FsmError::UnknownState`]); a key mapped to an empty set
/// is a terminal state with no outgoing edges. The full `HashMap` API
/// is available through `Deref`/`DerefMut`.
///
/// # Example
///
/// ```rust
/// use statemap::{create_set, TransitionMap};
///
/// let mut map = TransitionMap::new();
/// map.insert("INIT", create_set(["ACTION"]).unwrap());
/// map.insert("ACTION", create_set(["FINISHED"]).unwrap());
///
/// assert!(map.contains_key("INIT"));
/// assert!(!map.contains_key("FINISHED")); // terminal: absent key
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionMap(HashMap<String, StateSet>);

impl TransitionMap {
    /// Create an empty transition map.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert the reachable set for a state, returning the previous set
    /// if one was registered.
    pub fn insert(&mut self, state: impl Into<String>, next: StateSet) -> Option<StateSet> {
        self.0.insert(state.into(), next)
    }

    /// Move the map behind a shared handle.
    ///
    /// Keep a clone of the handle to mutate the map after machines have
    /// been constructed over it; one map may back several machines.
    pub fn shared(self) -> SharedStateMap {
        Rc::new(RefCell::new(self))
    }
}

impl Deref for TransitionMap {
    type Target = HashMap<String, StateSet>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TransitionMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Shared, caller-owned handle to a [`TransitionMap`].
///
/// Single-threaded by design: the whole machine is synchronous and
/// cooperative, so `Rc<RefCell<_>>` is the right amount of sharing.
pub type SharedStateMap = Rc<RefCell<TransitionMap>>;

/// Build a [`StateSet`] from state names, collapsing duplicates.
///
/// Every name must be non-empty; an empty name fails with
/// [`FsmError::InvalidArgument`]. This is a leaf helper for callers
/// assembling transition maps — the machine itself never calls it.
///
/// # Example
///
/// ```rust
/// use statemap::create_set;
///
/// let set = create_set(["red", "green"]).unwrap();
/// assert_eq!(set.len(), 2);
///
/// assert!(create_set(["red", ""]).is_err());
/// ```
pub fn create_set<I, S>(states: I) -> Result<StateSet, FsmError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set = StateSet::new();
    for state in states {
        let state = state.into();
        if state.is_empty() {
            return Err(FsmError::InvalidArgument(
                "state names must be non-empty strings".to_string(),
            ));
        }
        set.insert(state);
    }
    Ok(set)
}
