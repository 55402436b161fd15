//! Routing criterion.
//!
//! The criterion decides which actions leave the local pipeline for the
//! socket. It is supplied once at router construction and never
//! reinterpreted afterwards.

use crate::action::{Action, EMIT_ACTION_PREFIX};
use std::fmt;
use std::sync::Arc;

/// A predicate over `(type, action)`.
pub type Predicate = Arc<dyn Fn(&str, &Action) -> bool + Send + Sync>;

/// The matching rule deciding whether an action is routed to the socket.
///
/// An action without a string `type` never matches, under every variant.
#[derive(Clone)]
pub enum Criterion {
    /// Match when the predicate returns `true` for `(type, action)`.
    Predicate(Predicate),
    /// Match when the action's `type` starts with the string.
    Prefix(String),
    /// Match when the action's `type` starts with any element.
    ///
    /// Evaluation short-circuits on the first match; an empty list never
    /// matches.
    Prefixes(Vec<String>),
}

impl Criterion {
    /// Build a predicate criterion from a closure.
    #[must_use]
    pub fn predicate(f: impl Fn(&str, &Action) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Evaluate the criterion against an action.
    #[must_use]
    pub fn matches(&self, action: &Action) -> bool {
        let Some(kind) = action.kind() else {
            return false;
        };

        match self {
            Self::Predicate(test) => test.as_ref()(kind, action),
            Self::Prefix(prefix) => kind.starts_with(prefix),
            Self::Prefixes(prefixes) => prefixes.iter().any(|p| kind.starts_with(p)),
        }
    }
}

impl Default for Criterion {
    fn default() -> Self {
        Self::Prefix(EMIT_ACTION_PREFIX.to_string())
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Criterion::Predicate(..)"),
            Self::Prefix(prefix) => f.debug_tuple("Criterion::Prefix").field(prefix).finish(),
            Self::Prefixes(prefixes) => {
                f.debug_tuple("Criterion::Prefixes").field(prefixes).finish()
            }
        }
    }
}

impl From<&str> for Criterion {
    fn from(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }
}

impl From<String> for Criterion {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

impl From<Vec<String>> for Criterion {
    fn from(prefixes: Vec<String>) -> Self {
        Self::Prefixes(prefixes)
    }
}

impl From<Vec<&str>> for Criterion {
    fn from(prefixes: Vec<&str>) -> Self {
        Self::Prefixes(prefixes.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_prefix_is_a_prefix_test() {
        let criterion = Criterion::from("SOCKET_IO_EMIT/");

        assert!(criterion.matches(&Action::new("SOCKET_IO_EMIT/PING")));
        assert!(criterion.matches(&Action::new("SOCKET_IO_EMIT/")));
        assert!(!criterion.matches(&Action::new("OTHER")));
        // Containment elsewhere in the string is not a match.
        assert!(!criterion.matches(&Action::new("X_SOCKET_IO_EMIT/PING")));
    }

    #[test]
    fn test_prefix_list() {
        let criterion = Criterion::from(vec!["CHAT/", "GAME/"]);

        assert!(criterion.matches(&Action::new("CHAT/say")));
        assert!(criterion.matches(&Action::new("GAME/move")));
        assert!(!criterion.matches(&Action::new("LOBBY/join")));
    }

    #[test]
    fn test_empty_prefix_list_never_matches() {
        let criterion = Criterion::Prefixes(Vec::new());
        assert!(!criterion.matches(&Action::new("ANYTHING")));
    }

    #[test]
    fn test_predicate_decides() {
        let criterion = Criterion::predicate(|kind, action| {
            kind.ends_with("/send") && action.field("urgent") == Some(&json!(true))
        });

        let urgent = Action::new("CHAT/send").with_field("urgent", json!(true));
        let relaxed = Action::new("CHAT/send").with_field("urgent", json!(false));

        assert!(criterion.matches(&urgent));
        assert!(!criterion.matches(&relaxed));
    }

    #[test]
    fn test_missing_type_never_matches() {
        let always = Criterion::predicate(|_, _| true);

        assert!(!always.matches(&Action::from(Value::Null)));
        assert!(!always.matches(&Action::from(json!({ "data": 1 }))));
        assert!(!always.matches(&Action::from(json!({ "type": 42 }))));
    }

    #[test]
    fn test_default_is_emit_prefix() {
        let criterion = Criterion::default();
        assert!(criterion.matches(&Action::new("SOCKET_IO_EMIT/x")));
        assert!(!criterion.matches(&Action::new("SOCKET_IO_ON/x")));
    }
}
