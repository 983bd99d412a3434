//! Shared contract for declared parameters and the two-phase output
//! parameter base.
//!
//! Parameters are declared first and lazily finalized before first
//! meaningful use: finalization checks that a usable value was bound and
//! resolves the parameter name from it.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};
use crate::params::binding::BindValue;

/// Runtime kind of a declared parameter. Kind matching is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    FileOutput,
    ValueOutput,
    StdoutOutput,
}

/// Contract shared by every parameter declared on a process.
pub trait DeclaredParam: Send + Sync {
    /// The parameter's runtime kind.
    fn kind(&self) -> ParamKind;

    /// Position among sibling parameters, assigned at construction.
    fn index(&self) -> usize;

    /// The resolved parameter name. Querying before a specification has
    /// been bound is an error; `None` is a legal resolved name for some
    /// specializations.
    fn name(&self) -> Result<Option<&str>>;

    /// Idempotent finalization, invoked before first meaningful use.
    fn lazy_init(&self) -> Result<()>;

    /// Propagated "singleton" policy. Returns false when the parameter
    /// does not support the capability; such parameters are unaffected.
    fn set_singleton(&mut self, _flag: bool) -> bool {
        false
    }

    /// Downcast support for type-narrowed collection queries.
    fn as_any(&self) -> &dyn Any;
}

/// Declaration state shared by the output parameter kinds: the primary
/// binding, an optional fallback "from" binding, and the lazily resolved
/// name.
#[derive(Debug)]
pub struct OutputBase {
    index: usize,
    bound: Option<BindValue>,
    from: Option<BindValue>,
    name: OnceCell<Option<String>>,
    singleton: bool,
    optional: bool,
}

impl OutputBase {
    /// Create an unbound base at the given declaration index.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            bound: None,
            from: None,
            name: OnceCell::new(),
            singleton: false,
            optional: false,
        }
    }

    /// Set the primary binding. Last bind wins.
    pub fn bind(&mut self, value: BindValue) {
        self.bound = Some(value);
    }

    /// Set the fallback binding used when the primary one is absent or is
    /// a bare placeholder (template string or resolver function).
    pub fn bind_from(&mut self, value: BindValue) {
        self.from = Some(value);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether lazy finalization has already run.
    pub fn is_initialized(&self) -> bool {
        self.name.get().is_some()
    }

    pub fn set_singleton(&mut self, flag: bool) {
        self.singleton = flag;
    }

    pub fn singleton(&self) -> bool {
        self.singleton
    }

    pub fn set_optional(&mut self, flag: bool) {
        self.optional = flag;
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    /// Finalize the parameter: pick the effective binding and resolve the
    /// name from it. Idempotent; the first outcome is kept.
    pub fn lazy_init(&self) -> Result<()> {
        self.resolved_name().map(|_| ())
    }

    /// The parameter name, finalizing on first access.
    pub fn resolved_name(&self) -> Result<Option<&str>> {
        let name = self
            .name
            .get_or_try_init(|| self.effective_binding().and_then(Self::resolve_name))?;
        Ok(name.as_deref())
    }

    /// The binding that finalization resolves against: the primary one if
    /// it can stand on its own, otherwise the fallback.
    fn effective_binding(&self) -> Result<&BindValue> {
        if let Some(bound) = &self.bound {
            if bound.is_usable_binding() {
                return Ok(bound);
            }
        }
        self.from.as_ref().ok_or(ParamError::MissingBinding {
            index: self.index,
        })
    }

    /// Name resolution dispatch on the effective binding's kind.
    fn resolve_name(binding: &BindValue) -> Result<Option<String>> {
        match binding {
            BindValue::Var(name) => Ok(Some(name.clone())),
            BindValue::Str(s) if !crate::template::Template::has_placeholders(s) => {
                Ok(Some(s.clone()))
            }
            // Resolver functions get a stable internal name derived from
            // the function object's identity; the '$' prefix marks it as
            // non-user-facing.
            BindValue::Func(f) => {
                let addr = Arc::as_ptr(f) as *const () as usize;
                Ok(Some(format!("${:x}", addr)))
            }
            other => Err(ParamError::InvalidDeclaration { kind: other.kind() }),
        }
    }
}
