//! The output-file pattern resolver.
//!
//! A `FilePatternParam` owns one bound specification and the matching
//! options the filesystem walker will honor. Its single operation turns
//! the specification plus a runtime context into the ordered list of
//! sandbox-relative glob patterns to search for process outputs.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::context::{ContextValue, ResolveContext};
use crate::error::{ParamError, Result};
use crate::params::base::{DeclaredParam, OutputBase, ParamKind};
use crate::params::binding::{BindValue, OutputSpec};
use crate::template::Template;

/// Filesystem entry kind the walker should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    File,
    Dir,
    Any,
}

impl FromStr for PathType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(PathType::File),
            "dir" => Ok(PathType::Dir),
            "any" => Ok(PathType::Any),
            other => Err(ParamError::InvalidConfiguration {
                value: other.to_string(),
            }),
        }
    }
}

/// Matching options stored on a file-pattern parameter.
///
/// Apart from `separator` and `glob_escape`, these fields are read by the
/// filesystem walker, not interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Splits a single resolved string into multiple patterns.
    #[serde(default = "default_separator")]
    pub separator: Option<char>,
    /// Match hidden files.
    #[serde(default)]
    pub include_hidden: bool,
    /// Also match files staged as process inputs.
    #[serde(default)]
    pub include_inputs: bool,
    /// Restrict matches to a filesystem entry kind.
    #[serde(default)]
    pub path_type: Option<PathType>,
    /// Depth limit for the walk.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Follow symlinks during the walk.
    #[serde(default = "default_true")]
    pub follow_links: bool,
    /// Escape literal glob metacharacters in static resolved paths.
    #[serde(default = "default_true")]
    pub glob_escape: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            include_hidden: false,
            include_inputs: false,
            path_type: None,
            max_depth: None,
            follow_links: true,
            glob_escape: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_separator() -> Option<char> {
    Some(':')
}

/// A declared output-file parameter: one specification plus matching
/// options.
#[derive(Debug)]
pub struct FilePatternParam {
    base: OutputBase,
    spec: OutputSpec,
    // Set by a variable-reference bind; survives later re-binds of the
    // specification and is the only name this kind exposes.
    captured_name: Option<String>,
    options: MatchOptions,
}

impl FilePatternParam {
    /// Create an unbound parameter at the given declaration index.
    pub fn new(index: usize) -> Self {
        Self {
            base: OutputBase::new(index),
            spec: OutputSpec::None,
            captured_name: None,
            options: MatchOptions::default(),
        }
    }

    /// Bind a specification. Dispatch is evaluated in fixed order: a
    /// string with `${...}` placeholders becomes a template, a variable
    /// reference keeps its name, a function is stored verbatim, and
    /// anything else is carried in its string form as a literal pattern.
    /// Each call replaces the prior specification.
    pub fn bind(&mut self, value: impl Into<BindValue>) -> &mut Self {
        let value = value.into();
        self.spec = match &value {
            BindValue::Str(s) if Template::has_placeholders(s) => {
                OutputSpec::Template(Template::parse(s))
            }
            BindValue::Var(name) => {
                self.captured_name = Some(name.clone());
                OutputSpec::VarRef(name.clone())
            }
            BindValue::Func(f) => OutputSpec::Dynamic(f.clone()),
            BindValue::Str(s) => OutputSpec::Literal(s.clone()),
            BindValue::Value(v) => OutputSpec::Literal(v.to_string()),
        };
        self.base.bind(value);
        self
    }

    /// The currently bound specification.
    pub fn spec(&self) -> &OutputSpec {
        &self.spec
    }

    /// True iff the specification is a resolver function or a template.
    pub fn is_dynamic(&self) -> bool {
        self.spec.is_dynamic()
    }

    /// The stored matching options, for the filesystem walker.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn separator(&mut self, ch: impl Into<Option<char>>) -> &mut Self {
        self.options.separator = ch.into();
        self
    }

    pub fn include_inputs(&mut self, flag: bool) -> &mut Self {
        self.options.include_inputs = flag;
        self
    }

    pub fn include_hidden(&mut self, flag: bool) -> &mut Self {
        self.options.include_hidden = flag;
        self
    }

    /// Alias for [`include_hidden`](Self::include_hidden).
    pub fn hidden(&mut self, flag: bool) -> &mut Self {
        self.include_hidden(flag)
    }

    /// Set the entry kind filter from its configuration string form.
    pub fn path_type(&mut self, value: &str) -> Result<&mut Self> {
        self.options.path_type = Some(PathType::from_str(value)?);
        Ok(self)
    }

    pub fn max_depth(&mut self, depth: u32) -> &mut Self {
        self.options.max_depth = Some(depth);
        self
    }

    pub fn follow_links(&mut self, flag: bool) -> &mut Self {
        self.options.follow_links = flag;
        self
    }

    pub fn glob_escape(&mut self, flag: bool) -> &mut Self {
        self.options.glob_escape = flag;
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

    /// Resolve the specification against a runtime context into the
    /// ordered list of patterns to search under `work_dir`.
    ///
    /// An anonymous parameter swallows missing-variable failures from
    /// templates and resolver functions and contributes no patterns; a
    /// parameter named by a variable-reference bind propagates them. Any
    /// other resolver failure is always surfaced.
    pub fn file_patterns(&self, context: &ResolveContext, work_dir: &Path) -> Result<Vec<String>> {
        let entry = match &self.spec {
            OutputSpec::None => return Ok(Vec::new()),
            OutputSpec::Literal(s) => ContextValue::String(s.clone()),
            OutputSpec::VarRef(name) => context
                .get(name)
                .cloned()
                .unwrap_or_else(|| ContextValue::String(name.clone())),
            OutputSpec::Template(template) => match template.render(context) {
                Ok(rendered) => ContextValue::String(rendered),
                Err(err) => return self.missing_variable_outcome(err),
            },
            OutputSpec::Dynamic(resolver) => match resolver(context) {
                Ok(value) => value,
                Err(err) => return self.missing_variable_outcome(err),
            },
        };

        if entry.is_empty() {
            return Ok(Vec::new());
        }

        let patterns = match entry {
            ContextValue::Path(path) => vec![self.relativize_path(&path, work_dir)?],
            ContextValue::List(items) => items
                .iter()
                .map(|item| match item {
                    ContextValue::Path(path) => self.relativize_path(path, work_dir),
                    other => relativize_str(&other.to_string(), work_dir),
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                let raw = other.to_string();
                match self.options.separator {
                    Some(sep) if raw.contains(sep) => raw
                        .split(sep)
                        .map(|segment| relativize_str(segment, work_dir))
                        .collect::<Result<Vec<_>>>()?,
                    _ => vec![relativize_str(&raw, work_dir)?],
                }
            }
        };

        debug!(
            index = self.base.index(),
            count = patterns.len(),
            "resolved output patterns"
        );
        Ok(patterns)
    }

    /// Strict/lenient rule for missing context variables, keyed on whether
    /// this parameter has a resolvable name. Only the missing-variable
    /// failure kind is ever swallowed.
    fn missing_variable_outcome(&self, err: ParamError) -> Result<Vec<String>> {
        match err {
            ParamError::MissingVariable { ref name } if self.captured_name.is_none() => {
                trace!(
                    index = self.base.index(),
                    variable = %name,
                    "anonymous output parameter: missing variable yields no patterns"
                );
                Ok(Vec::new())
            }
            other => Err(other),
        }
    }

    /// Path-form relativization: a relative path passes through, an
    /// absolute one must be nested below `work_dir` and is reduced to the
    /// subpath beneath it. Static paths are glob-escaped when configured.
    fn relativize_path(&self, value: &Path, work_dir: &Path) -> Result<String> {
        if value.is_relative() {
            return Ok(self.escaped(value));
        }
        let sub = value
            .strip_prefix(work_dir)
            .map_err(|_| ParamError::OutOfScope {
                path: value.display().to_string(),
                work_dir: work_dir.to_path_buf(),
            })?;
        if sub.as_os_str().is_empty() {
            return Err(ParamError::MissingName {
                path: value.display().to_string(),
            });
        }
        Ok(self.escaped(sub))
    }

    fn escaped(&self, path: &Path) -> String {
        let s = path.to_string_lossy().to_string();
        if self.options.glob_escape {
            glob::Pattern::escape(&s)
        } else {
            s
        }
    }
}

/// String-form relativization: a value not starting with `/` is already
/// relative and passes through untouched. An absolute value must start
/// with the working directory's string form; the remainder after the
/// directory and its separator is the pattern.
fn relativize_str(value: &str, work_dir: &Path) -> Result<String> {
    if !value.starts_with('/') {
        return Ok(value.to_string());
    }
    let prefix = work_dir.to_string_lossy();
    if !value.starts_with(prefix.as_ref()) {
        return Err(ParamError::OutOfScope {
            path: value.to_string(),
            work_dir: work_dir.to_path_buf(),
        });
    }
    if value.len() - prefix.len() < 2 {
        return Err(ParamError::MissingName {
            path: value.to_string(),
        });
    }
    Ok(value[prefix.len() + 1..].to_string())
}

impl DeclaredParam for FilePatternParam {
    fn kind(&self) -> ParamKind {
        ParamKind::FileOutput
    }

    fn index(&self) -> usize {
        self.base.index()
    }

    /// Only a name captured by a variable-reference bind is exposed; the
    /// synthesized internal name a resolver binding may hold is not.
    fn name(&self) -> Result<Option<&str>> {
        Ok(self.captured_name.as_deref())
    }

    fn lazy_init(&self) -> Result<()> {
        if !self.spec.is_bound() {
            return Err(ParamError::MissingBinding {
                index: self.base.index(),
            });
        }
        Ok(())
    }

    fn set_singleton(&mut self, flag: bool) -> bool {
        self.base.set_singleton(flag);
        true
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
