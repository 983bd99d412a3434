//! Template strings with embedded `${...}` variable references.
//!
//! A template is parsed once into literal and variable segments and can be
//! rendered repeatedly against different contexts. Supports `${name}` and
//! the default-value form `${name:-fallback}`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::ResolveContext;
use crate::error::{ParamError, Result};

/// Matches `${name}` and `${name:-default}` placeholders.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("invalid placeholder regex"));

/// A parsed template string.
#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Variable { name: String, default: Option<String> },
}

impl Template {
    /// Parse a template string into segments. Text outside placeholders is
    /// kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for cap in PLACEHOLDER.captures_iter(raw) {
            let full = cap.get(0).expect("capture 0 always present");
            let expr = cap.get(1).expect("placeholder body").as_str();

            if full.start() > last_end {
                segments.push(Segment::Literal(raw[last_end..full.start()].to_string()));
            }

            let (name, default) = match expr.find(":-") {
                Some(idx) => (expr[..idx].to_string(), Some(expr[idx + 2..].to_string())),
                None => (expr.to_string(), None),
            };
            segments.push(Segment::Variable { name, default });

            last_end = full.end();
        }

        if last_end < raw.len() {
            segments.push(Segment::Literal(raw[last_end..].to_string()));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Whether a string contains any variable placeholder. This is the
    /// test the bind dispatch uses to classify a string as a template.
    pub fn has_placeholders(s: &str) -> bool {
        PLACEHOLDER.is_match(s)
    }

    /// The original template text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Render the template against a context.
    ///
    /// A missing variable renders its default when one was declared,
    /// otherwise the render fails with [`ParamError::MissingVariable`] so
    /// the caller can apply its own strict or lenient policy.
    pub fn render(&self, context: &ResolveContext) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable { name, default } => match context.get(name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => match default {
                        Some(fallback) => out.push_str(fallback),
                        None => {
                            return Err(ParamError::MissingVariable { name: name.clone() });
                        }
                    },
                },
            }
        }
        Ok(out)
    }
}
