//! Runtime value domain and the per-invocation variable context.
//!
//! The execution engine resolves every variable for one process invocation
//! and hands the result to the output resolvers as a [`ResolveContext`].
//! Values are modeled as a tagged enum so that filesystem paths and ordered
//! multi-value containers keep their structure instead of collapsing to
//! strings before resolution has a chance to inspect them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A single value resolved for a process invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// A single filesystem path.
    Path(PathBuf),
    /// An ordered multi-value container.
    List(Vec<ContextValue>),
}

impl ContextValue {
    /// True for values that contribute no output patterns: an absent
    /// value, an empty string, or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            ContextValue::Null => true,
            ContextValue::String(s) => s.is_empty(),
            ContextValue::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Null => Ok(()),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Number(n) => write!(f, "{}", n),
            ContextValue::String(s) => f.write_str(s),
            ContextValue::Path(p) => write!(f, "{}", p.display()),
            ContextValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<PathBuf> for ContextValue {
    fn from(p: PathBuf) -> Self {
        ContextValue::Path(p)
    }
}

impl From<Vec<ContextValue>> for ContextValue {
    fn from(items: Vec<ContextValue>) -> Self {
        ContextValue::List(items)
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(b),
            Value::Number(n) => ContextValue::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => ContextValue::String(s),
            Value::Array(arr) => {
                ContextValue::List(arr.into_iter().map(ContextValue::from).collect())
            }
            // Objects have no pattern meaning; keep their compact JSON form
            Value::Object(_) => {
                ContextValue::String(serde_json::to_string(&value).unwrap_or_default())
            }
        }
    }
}

/// The name→value mapping for one process invocation.
///
/// Populated by the execution engine before resolution starts; the
/// resolvers only read it.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    variables: HashMap<String, ContextValue>,
}

impl ResolveContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable in the context.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ContextValue>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Fluent form of [`set`](Self::set), handy when building a context in
    /// one expression.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a variable value, if present.
    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.variables.get(name)
    }

    /// Whether a variable is present.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of variables in the context.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when the context holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Build a context from a JSON object, converting each member value.
    pub fn from_json_object(obj: &serde_json::Map<String, Value>) -> Self {
        let mut context = Self::new();
        for (key, value) in obj {
            context.set(key.clone(), ContextValue::from(value.clone()));
        }
        context
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for ResolveContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (name, value) in iter {
            context.set(name, value);
        }
        context
    }
}
