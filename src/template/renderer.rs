//! Strict `{{NAME}}` substitution.
//!
//! # Responsibilities
//! - Split template text into literal and placeholder segments
//! - Reject malformed placeholders and unresolved names before output
//! - Substitute every placeholder in one pass

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::RenderError;
use crate::observability::metrics;
use crate::template::context::TemplateContext;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A parsed template. Borrowed from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
    len: usize,
}

impl<'a> Template<'a> {
    /// Parse `text`, failing on any `{{` that does not open a placeholder.
    pub fn parse(text: &'a str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in PLACEHOLDER.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut segments, text, cursor, whole.start())?;
            segments.push(Segment::Placeholder(name.as_str()));
            cursor = whole.end();
        }
        push_literal(&mut segments, text, cursor, text.len())?;

        Ok(Self {
            segments,
            len: text.len(),
        })
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = *segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Placeholders that are not in `declared`.
    pub fn undeclared(&self, declared: &[&str]) -> Vec<&'a str> {
        self.placeholders()
            .into_iter()
            .filter(|name| !declared.contains(name))
            .collect()
    }

    /// Fail on the first placeholder outside `declared`.
    pub fn ensure_declared(&self, declared: &[&str]) -> Result<(), RenderError> {
        match self.undeclared(declared).first() {
            Some(name) => Err(RenderError::UnknownPlaceholder {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Substitute every placeholder from `context`.
    ///
    /// All names are checked before any output is produced.
    pub fn render(&self, context: &TemplateContext) -> Result<RenderedScript, RenderError> {
        if let Some(name) = self.placeholders().into_iter().find(|n| !context.contains(n)) {
            return Err(RenderError::MissingParameter {
                name: name.to_string(),
            });
        }

        let mut out = String::with_capacity(self.len);
        for segment in &self.segments {
            match *segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = context.get(name) {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(RenderedScript(out))
    }
}

fn push_literal<'a>(
    segments: &mut Vec<Segment<'a>>,
    text: &'a str,
    start: usize,
    end: usize,
) -> Result<(), RenderError> {
    let literal = &text[start..end];
    if let Some(pos) = literal.find("{{") {
        return Err(RenderError::MalformedPlaceholder { offset: start + pos });
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(())
}

/// Parse and render in one call.
pub fn render(template: &str, context: &TemplateContext) -> Result<RenderedScript, RenderError> {
    record(Template::parse(template).and_then(|t| t.render(context)))
}

/// Parse once, reject names outside `declared`, then render.
pub fn render_declared(
    template: &str,
    context: &TemplateContext,
    declared: &[&str],
) -> Result<RenderedScript, RenderError> {
    record(Template::parse(template).and_then(|t| {
        t.ensure_declared(declared)?;
        t.render(context)
    }))
}

fn record(result: Result<RenderedScript, RenderError>) -> Result<RenderedScript, RenderError> {
    match &result {
        Ok(script) => {
            tracing::debug!(bytes = script.len(), "Rendered template");
            metrics::record_script_rendered();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Template rendering failed");
            metrics::record_error("render");
        }
    }
    result
}

/// Final script text. Changing it means producing a new one, never editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderedScript(String);

impl RenderedScript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex SHA-256 of the script.
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.0.as_bytes()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RenderedScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
