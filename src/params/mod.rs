//! Declared parameter model for one process: the shared parameter
//! contract, the output-file pattern resolver, and the ordered collection
//! the declaration front-end populates.

pub mod base;
pub mod binding;
pub mod collection;
pub mod file_pattern;
pub mod value;

pub use base::{DeclaredParam, OutputBase, ParamKind};
pub use binding::{BindValue, OutputSpec, Resolver};
pub use collection::ParamList;
pub use file_pattern::{FilePatternParam, MatchOptions, PathType};
pub use value::{StdoutOutputParam, ValueOutputParam};
