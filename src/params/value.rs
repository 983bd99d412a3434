//! Non-file output parameter kinds.
//!
//! These carry just enough behavior to participate in the per-process
//! collection: a name resolved through the shared base lifecycle and the
//! propagated singleton policy.

use std::any::Any;

use crate::error::Result;
use crate::params::base::{DeclaredParam, OutputBase, ParamKind};
use crate::params::binding::BindValue;

/// A named value output.
#[derive(Debug)]
pub struct ValueOutputParam {
    base: OutputBase,
}

impl ValueOutputParam {
    pub fn new(index: usize) -> Self {
        Self {
            base: OutputBase::new(index),
        }
    }

    /// Bind the declaration value this output is named after.
    pub fn bind(&mut self, value: impl Into<BindValue>) -> &mut Self {
        self.base.bind(value.into());
        self
    }

    /// Bind the fallback object used when the primary binding is a bare
    /// placeholder.
    pub fn bind_from(&mut self, value: impl Into<BindValue>) -> &mut Self {
        self.base.bind_from(value.into());
        self
    }

    pub fn optional(&mut self, flag: bool) -> &mut Self {
        self.base.set_optional(flag);
        self
    }

    pub fn is_optional(&self) -> bool {
        self.base.optional()
    }

    pub fn is_singleton(&self) -> bool {
        self.base.singleton()
    }
}

impl DeclaredParam for ValueOutputParam {
    fn kind(&self) -> ParamKind {
        ParamKind::ValueOutput
    }

    fn index(&self) -> usize {
        self.base.index()
    }

    fn name(&self) -> Result<Option<&str>> {
        self.base.resolved_name()
    }

    fn lazy_init(&self) -> Result<()> {
        self.base.lazy_init()
    }

    fn set_singleton(&mut self, flag: bool) -> bool {
        self.base.set_singleton(flag);
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The process standard-output stream as an output. Anonymous in user
/// terms; carries the conventional `-` name and needs no binding.
#[derive(Debug)]
pub struct StdoutOutputParam {
    index: usize,
    singleton: bool,
}

impl StdoutOutputParam {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            singleton: false,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }
}

impl DeclaredParam for StdoutOutputParam {
    fn kind(&self) -> ParamKind {
        ParamKind::StdoutOutput
    }

    fn index(&self) -> usize {
        self.index
    }

    fn name(&self) -> Result<Option<&str>> {
        Ok(Some("-"))
    }

    fn lazy_init(&self) -> Result<()> {
        Ok(())
    }

    fn set_singleton(&mut self, flag: bool) -> bool {
        self.singleton = flag;
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
