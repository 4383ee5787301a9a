//! Construction parameters and their normalization.
//!
//! A machine is described by three things — a transition map, an
//! optional start state, and an optional options object carrying an
//! `id` — and callers may supply them in any order. The loose layers
//! (start, options) travel as `serde_json::Value` so that a malformed
//! shape is a first-class, reportable input rather than a compile
//! error; [`MachineConfig::resolve`] inspects each parameter's shape
//! exactly once, and nothing downstream of construction ever branches
//! on types again.

use crate::core::SharedStateMap;
use crate::core::TransitionMap;
use crate::error::FsmError;
use serde_json::Value;

/// One construction parameter, in any of the recognizable shapes.
///
/// `From` impls cover the common literal spellings, so a parameter list
/// usually reads like the call it normalizes:
///
/// ```rust
/// use serde_json::json;
/// use statemap::{create_set, FiniteStateMachine, MachineParam, TransitionMap};
///
/// let mut map = TransitionMap::new();
/// map.insert("INIT", create_set(["DONE"]).unwrap());
///
/// let fsm = FiniteStateMachine::from_params([
///     MachineParam::Options(json!({ "id": "worker-1" })),
///     MachineParam::from("INIT"),
///     MachineParam::from(map),
/// ])
/// .unwrap();
///
/// assert_eq!(fsm.id(), Some("worker-1"));
/// assert_eq!(fsm.state(), Some("INIT"));
/// ```
#[derive(Clone, Debug)]
pub enum MachineParam {
    /// The transition map. Required.
    Map(SharedStateMap),
    /// The start state: a JSON string, or null for no initial state.
    Start(Value),
    /// An options object; the recognized `id` key must be a string.
    /// Unrecognized keys are ignored.
    Options(Value),
}

impl From<TransitionMap> for MachineParam {
    fn from(map: TransitionMap) -> Self {
        Self::Map(map.shared())
    }
}

impl From<SharedStateMap> for MachineParam {
    fn from(map: SharedStateMap) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for MachineParam {
    fn from(start: &str) -> Self {
        Self::Start(Value::String(start.to_string()))
    }
}

impl From<String> for MachineParam {
    fn from(start: String) -> Self {
        Self::Start(Value::String(start))
    }
}

impl From<Option<String>> for MachineParam {
    fn from(start: Option<String>) -> Self {
        match start {
            Some(state) => Self::Start(Value::String(state)),
            None => Self::Start(Value::Null),
        }
    }
}

/// Normalized construction parameters.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    /// The shared transition map.
    pub map: SharedStateMap,
    /// Initial state, `None` for a machine with no current state.
    pub start: Option<String>,
    /// Diagnostic identifier; no effect on transition semantics.
    pub id: Option<String>,
}

impl MachineConfig {
    /// Resolve a parameter list, in any order, into a normalized config.
    ///
    /// Each field is validated individually and fails fast with a
    /// distinct [`FsmError::InvalidArgument`] naming the offending
    /// value. When the same kind of parameter appears twice, the last
    /// one wins.
    pub fn resolve<I>(params: I) -> Result<Self, FsmError>
    where
        I: IntoIterator<Item = MachineParam>,
    {
        let mut map = None;
        let mut start = None;
        let mut id = None;

        for param in params {
            match param {
                MachineParam::Map(value) => map = Some(value),
                MachineParam::Start(value) => start = Some(resolve_start(value)?),
                MachineParam::Options(value) => id = resolve_options(value)?,
            }
        }

        let map = map.ok_or_else(|| {
            FsmError::InvalidArgument("next parameter must be a state map".to_string())
        })?;

        Ok(Self {
            map,
            start: start.unwrap_or(None),
            id,
        })
    }
}

fn resolve_start(value: Value) -> Result<Option<String>, FsmError> {
    match value {
        Value::String(state) => Ok(Some(state)),
        Value::Null => Ok(None),
        other => Err(FsmError::InvalidArgument(format!(
            "start parameter must be a string or null, got {other}"
        ))),
    }
}

fn resolve_options(value: Value) -> Result<Option<String>, FsmError> {
    let Value::Object(options) = value else {
        return Err(FsmError::InvalidArgument(format!(
            "options parameter must be an object, got {value}"
        )));
    };
    match options.get("id") {
        None => Ok(None),
        Some(Value::String(id)) => Ok(Some(id.clone())),
        Some(other) => Err(FsmError::InvalidArgument(format!(
            "id option must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::create_set;
    use serde_json::json;

    fn demo_map() -> TransitionMap {
        let mut map = TransitionMap::new();
        map.insert("INIT", create_set(["DONE"]).unwrap());
        map
    }

    #[test]
    fn parameters_resolve_in_any_order() {
        let forward = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::from("INIT"),
            MachineParam::Options(json!({ "id": "m1" })),
        ])
        .unwrap();

        let reversed = MachineConfig::resolve([
            MachineParam::Options(json!({ "id": "m1" })),
            MachineParam::from("INIT"),
            MachineParam::from(demo_map()),
        ])
        .unwrap();

        for config in [forward, reversed] {
            assert_eq!(config.start.as_deref(), Some("INIT"));
            assert_eq!(config.id.as_deref(), Some("m1"));
            assert!(config.map.borrow().contains_key("INIT"));
        }
    }

    #[test]
    fn map_parameter_is_required() {
        let result = MachineConfig::resolve([MachineParam::from("INIT")]);

        let Err(FsmError::InvalidArgument(message)) = result else {
            panic!("expected InvalidArgument");
        };
        assert_eq!(message, "next parameter must be a state map");
    }

    #[test]
    fn start_and_id_are_optional() {
        let config = MachineConfig::resolve([MachineParam::from(demo_map())]).unwrap();

        assert!(config.start.is_none());
        assert!(config.id.is_none());
    }

    #[test]
    fn null_start_is_accepted() {
        let config = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::Start(Value::Null),
        ])
        .unwrap();

        assert!(config.start.is_none());
    }

    #[test]
    fn non_string_start_is_rejected() {
        let result = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::Start(json!(42)),
        ]);

        let Err(FsmError::InvalidArgument(message)) = result else {
            panic!("expected InvalidArgument");
        };
        assert!(message.contains("string or null"));
        assert!(message.contains("42"));
    }

    #[test]
    fn non_object_options_are_rejected() {
        let result = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::Options(json!("id")),
        ]);

        assert!(matches!(result, Err(FsmError::InvalidArgument(_))));
    }

    #[test]
    fn non_string_id_is_rejected() {
        let result = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::Options(json!({ "id": 7 })),
        ]);

        let Err(FsmError::InvalidArgument(message)) = result else {
            panic!("expected InvalidArgument");
        };
        assert!(message.contains("id option"));
    }

    #[test]
    fn unrecognized_option_keys_are_ignored() {
        let config = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::Options(json!({ "id": "m1", "color": "red" })),
        ])
        .unwrap();

        assert_eq!(config.id.as_deref(), Some("m1"));
    }

    #[test]
    fn later_parameters_win() {
        let config = MachineConfig::resolve([
            MachineParam::from(demo_map()),
            MachineParam::from("FIRST"),
            MachineParam::from("SECOND"),
        ])
        .unwrap();

        assert_eq!(config.start.as_deref(), Some("SECOND"));
    }
}
