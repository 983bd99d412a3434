//! Typed errors raised while declaring and resolving process output
//! parameters.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParamError>;

/// Errors raised synchronously from binding, configuration, finalization,
/// or pattern resolution. None are retried internally.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A parameter reached finalization without any usable bound value.
    #[error("output parameter #{index} declared without a value binding")]
    MissingBinding { index: usize },

    /// The bound value's kind cannot yield a parameter name.
    #[error("cannot derive an output name from a {kind} binding")]
    InvalidDeclaration { kind: &'static str },

    /// An out-of-enum value passed to the path-type setter.
    #[error("invalid path type '{value}' (expected one of: file, dir, any)")]
    InvalidConfiguration { value: String },

    /// A resolved path lies outside the process working directory.
    #[error("output path '{path}' lies outside process working directory '{}'", .work_dir.display())]
    OutOfScope { path: String, work_dir: PathBuf },

    /// A resolved path equals the working directory itself.
    #[error("output pattern '{path}' names no file below the working directory")]
    MissingName { path: String },

    /// A variable referenced during template or dynamic resolution is not
    /// present in the process context.
    #[error("variable '{name}' not found in process context")]
    MissingVariable { name: String },

    /// A user-supplied resolver failed for a reason other than a missing
    /// context variable. Always surfaced.
    #[error("output resolver failed: {0}")]
    Resolver(#[from] anyhow::Error),
}
