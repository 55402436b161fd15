//! Action types flowing through the dispatch pipeline.
//!
//! An action is a JSON mapping identified by its `type` field. The router
//! inspects and forwards actions but never mutates them, so the type keeps
//! the underlying value intact — including shapes that carry no `type` at
//! all, which the routing contract treats as "never matches".

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Prefix naming actions synthesized from inbound socket events.
pub const ON_ACTION_PREFIX: &str = "SOCKET_IO_ON/";

/// Default prefix matched when routing actions out to the socket.
pub const EMIT_ACTION_PREFIX: &str = "SOCKET_IO_EMIT/";

/// An action in the dispatch pipeline.
///
/// Wraps a `serde_json::Value` transparently: an action serializes to and
/// deserializes from exactly the mapping it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action {
    value: Value,
}

impl Action {
    /// Create an action with the given `type`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            value: json!({ "type": kind.into() }),
        }
    }

    /// Create an action for an inbound socket event:
    /// `{ "type": prefix + event, "data": payload }`.
    #[must_use]
    pub fn synthesized(prefix: &str, event: &str, payload: Value) -> Self {
        Self {
            value: json!({
                "type": format!("{prefix}{event}"),
                "data": payload,
            }),
        }
    }

    /// Set the `event` field.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.set("event", Value::String(event.into()));
        self
    }

    /// Set the `data` field.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.set("data", data);
        self
    }

    /// Set an arbitrary field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    fn set(&mut self, name: impl Into<String>, value: Value) {
        match self.value.as_object_mut() {
            Some(fields) => {
                fields.insert(name.into(), value);
            }
            None => {
                let mut fields = Map::new();
                fields.insert(name.into(), value);
                self.value = Value::Object(fields);
            }
        }
    }

    /// The action's `type`, if it carries a string one.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.value.get("type")?.as_str()
    }

    /// The action's `event` field, if it carries a string one.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.value.get("event")?.as_str()
    }

    /// The action's `data` field.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.value.get("data")
    }

    /// An arbitrary field of the action.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    /// The underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Unwrap into the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for Action {
    fn from(value: Value) -> Self {
        Self { value }
    }
}

impl From<Action> for Value {
    fn from(action: Action) -> Self {
        action.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_builders() {
        let action = Action::new("SOCKET_IO_EMIT/chat")
            .with_event("chat")
            .with_data(json!({ "text": "hi" }));

        assert_eq!(action.kind(), Some("SOCKET_IO_EMIT/chat"));
        assert_eq!(action.event(), Some("chat"));
        assert_eq!(action.data(), Some(&json!({ "text": "hi" })));
        assert!(action.field("missing").is_none());
    }

    #[test]
    fn test_synthesized_shape() {
        let action = Action::synthesized(ON_ACTION_PREFIX, "connect", json!({ "sid": "abc" }));

        assert_eq!(
            action.as_value(),
            &json!({
                "type": "SOCKET_IO_ON/connect",
                "data": { "sid": "abc" },
            })
        );
    }

    #[test]
    fn test_kind_absent_or_not_a_string() {
        assert_eq!(Action::from(Value::Null).kind(), None);
        assert_eq!(Action::from(json!({ "data": 1 })).kind(), None);
        assert_eq!(Action::from(json!({ "type": 7 })).kind(), None);
        assert_eq!(Action::from(json!("bare string")).kind(), None);
    }

    #[test]
    fn test_transparent_serde() {
        let raw = json!({ "type": "PING", "data": [1, 2, 3] });
        let action: Action = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(action.kind(), Some("PING"));
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }
}
