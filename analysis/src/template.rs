//! Message-template parsing and the per-pass template cache.
//!
//! A template is a string with `{Name[:format]}` placeholders. `{{` and `}}`
//! are escapes for literal braces. The parser preserves the raw property text
//! (including any capturing sigil and format suffix) together with its byte
//! offset inside the template, so fix builders can pinpoint exact ranges
//! inside the string literal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Capturing hint sigil on a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sigil {
    /// `@` — capture the argument structurally.
    Capture,
    /// `$` — force scalar (stringified) rendering.
    Scalar,
}

/// One `{...}` placeholder extracted from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// The raw text between the braces, e.g. `@User:F2`.
    pub raw: String,
    /// Byte offset of `raw` inside the template (just past the `{`).
    pub offset: usize,
}

impl Property {
    /// The property text without a format suffix, e.g. `@User`.
    pub fn name_with_sigil(&self) -> &str {
        match self.raw.find(':') {
            Some(idx) => &self.raw[..idx],
            None => &self.raw,
        }
    }

    /// The base name with sigil and format suffix stripped.
    pub fn base_name(&self) -> &str {
        let name = self.name_with_sigil();
        name.strip_prefix('@')
            .or_else(|| name.strip_prefix('$'))
            .unwrap_or(name)
    }

    /// The capturing sigil, if any.
    pub fn sigil(&self) -> Option<Sigil> {
        match self.raw.as_bytes().first() {
            Some(b'@') => Some(Sigil::Capture),
            Some(b'$') => Some(Sigil::Scalar),
            _ => None,
        }
    }

    /// The format suffix after `:`, if any.
    pub fn format(&self) -> Option<&str> {
        self.raw.find(':').map(|idx| &self.raw[idx + 1..])
    }
}

/// Parse a message template and extract its properties.
///
/// Linear single-pass scan. Escaped braces (`{{`) are skipped as literal
/// text; nested braces inside a property are kept as part of the property
/// text. Empty property names (`{}`) are silently dropped here — the naming
/// check reports them. An unterminated `{` fails the whole parse.
pub fn parse_template(template: &str) -> Result<Vec<Property>, TemplateError> {
    let bytes = template.as_bytes();
    let mut properties = Vec::new();
    let mut in_property = false;
    let mut property_start = 0usize;
    let mut brace_depth = 0usize;

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if !in_property && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                i += 2; // literal escaped brace
                continue;
            }
            if !in_property {
                in_property = true;
                property_start = i + 1;
                brace_depth = 1;
            } else {
                brace_depth += 1;
            }
        } else if bytes[i] == b'}' && in_property {
            brace_depth -= 1;
            if brace_depth == 0 {
                if i > property_start {
                    properties.push(Property {
                        raw: template[property_start..i].to_string(),
                        offset: property_start,
                    });
                }
                in_property = false;
            }
        }
        i += 1;
    }

    if in_property {
        return Err(TemplateError::UnclosedBrace {
            position: property_start.saturating_sub(1),
        });
    }

    Ok(properties)
}

/// Memoizes parser output for one pass, keyed by (strict mode, template).
///
/// Strict mode participates in the key so the same template text cannot leak
/// a lenient-mode result into a strict-mode lookup.
#[derive(Debug, Default)]
pub struct TemplateCache {
    cache: HashMap<(bool, String), Result<Vec<Property>, TemplateError>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, template: &str, strict: bool) -> &Result<Vec<Property>, TemplateError> {
        self.cache
            .entry((strict, template.to_string()))
            .or_insert_with(|| parse_template(template))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}
