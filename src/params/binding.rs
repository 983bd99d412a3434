//! Values handed to `bind` by the declaration front-end, and the stored
//! specification they dispatch into.

use std::fmt;
use std::sync::Arc;

use crate::context::{ContextValue, ResolveContext};
use crate::error::Result;
use crate::template::Template;

/// A user-supplied dynamic resolver. Invoked with the process context as
/// its evaluation scope; may read ambient state and may fail.
pub type Resolver = Arc<dyn Fn(&ResolveContext) -> Result<ContextValue> + Send + Sync>;

/// A value the declaration front-end binds to a parameter.
#[derive(Clone)]
pub enum BindValue {
    /// A plain or template string from the declaration.
    Str(String),
    /// A named variable reference.
    Var(String),
    /// A user-supplied resolver function, stored verbatim.
    Func(Resolver),
    /// Any other declaration value, carried in structured form.
    Value(ContextValue),
}

impl BindValue {
    /// Wrap a named variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        BindValue::Var(name.into())
    }

    /// Wrap a resolver function.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&ResolveContext) -> Result<ContextValue> + Send + Sync + 'static,
    {
        BindValue::Func(Arc::new(f))
    }

    /// Short label for the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            BindValue::Str(s) if Template::has_placeholders(s) => "template string",
            BindValue::Str(_) => "string",
            BindValue::Var(_) => "variable",
            BindValue::Func(_) => "function",
            BindValue::Value(_) => "value",
        }
    }

    /// Whether this value can stand on its own as a parameter's effective
    /// binding. Template strings and resolver functions are placeholders:
    /// they need a separate fallback binding to finalize against.
    pub(crate) fn is_usable_binding(&self) -> bool {
        match self {
            BindValue::Str(s) => !Template::has_placeholders(s),
            BindValue::Func(_) => false,
            _ => true,
        }
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Str(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Str(s)
    }
}

impl From<ContextValue> for BindValue {
    fn from(v: ContextValue) -> Self {
        BindValue::Value(v)
    }
}

impl fmt::Debug for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            BindValue::Var(name) => f.debug_tuple("Var").field(name).finish(),
            BindValue::Func(_) => f.write_str("Func(..)"),
            BindValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// The specification stored on a file-pattern parameter. Exactly one kind
/// is active; re-binding overwrites it.
#[derive(Clone, Default)]
pub enum OutputSpec {
    /// Nothing bound yet.
    #[default]
    None,
    /// A literal pattern used as-is.
    Literal(String),
    /// A named variable reference, resolved at runtime as a context lookup
    /// falling back to the literal name when absent.
    VarRef(String),
    /// A template string substituted from the context at runtime.
    Template(Template),
    /// A user-supplied resolver invoked with the context at runtime.
    Dynamic(Resolver),
}

impl OutputSpec {
    /// True iff the specification needs the runtime context to produce its
    /// value.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, OutputSpec::Dynamic(_) | OutputSpec::Template(_))
    }

    /// Whether any specification has been bound.
    pub fn is_bound(&self) -> bool {
        !matches!(self, OutputSpec::None)
    }
}

impl fmt::Debug for OutputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputSpec::None => f.write_str("None"),
            OutputSpec::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            OutputSpec::VarRef(name) => f.debug_tuple("VarRef").field(name).finish(),
            OutputSpec::Template(t) => f.debug_tuple("Template").field(&t.raw()).finish(),
            OutputSpec::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(BindValue::from("plain.txt").kind(), "string");
        assert_eq!(BindValue::from("out_${x}.txt").kind(), "template string");
        assert_eq!(BindValue::var("sample").kind(), "variable");
        assert_eq!(
            BindValue::func(|_| Ok(ContextValue::Null)).kind(),
            "function"
        );
    }

    #[test]
    fn test_placeholder_values_are_not_usable_bindings() {
        assert!(BindValue::from("plain.txt").is_usable_binding());
        assert!(BindValue::var("x").is_usable_binding());
        assert!(!BindValue::from("out_${x}.txt").is_usable_binding());
        assert!(!BindValue::func(|_| Ok(ContextValue::Null)).is_usable_binding());
    }

    #[test]
    fn test_spec_dynamic_flag() {
        assert!(OutputSpec::Template(Template::parse("${x}")).is_dynamic());
        assert!(OutputSpec::Dynamic(Arc::new(|_| Ok(ContextValue::Null))).is_dynamic());
        assert!(!OutputSpec::Literal("a.txt".into()).is_dynamic());
        assert!(!OutputSpec::VarRef("x".into()).is_dynamic());
        assert!(!OutputSpec::None.is_dynamic());
    }
}
