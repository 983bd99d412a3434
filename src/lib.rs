//! # Outspec
//!
//! Resolves the declarative output-file specifications attached to a
//! pipeline process into concrete, validated, sandbox-relative glob
//! patterns.
//!
//! A process declares what files or directories it is expected to produce
//! as a literal pattern, a variable reference, a template string, or a
//! user-supplied resolver function. At execution time the engine hands each
//! declared parameter the resolved variable context and the process working
//! directory, and receives back the ordered list of patterns to search for
//! outputs. No resolved path may escape the working-directory sandbox; this
//! crate is the single choke point enforcing that.
//!
//! The crate computes *which patterns to look for and where*. It performs
//! no filesystem walking and executes nothing.
//!
//! ## Modules
//!
//! - `context` - Runtime value domain and the per-invocation variable context
//! - `template` - Template strings with embedded `${...}` variable references
//! - `params` - Declared parameter model, the file-pattern resolver, and the
//!   per-process parameter collection
//! - `error` - Typed errors raised during declaration and resolution

pub mod context;
pub mod error;
pub mod params;
pub mod template;

pub use context::{ContextValue, ResolveContext};
pub use error::{ParamError, Result};
pub use params::{
    BindValue, DeclaredParam, FilePatternParam, MatchOptions, OutputSpec, ParamKind, ParamList,
    PathType, StdoutOutputParam, ValueOutputParam,
};
pub use template::Template;
