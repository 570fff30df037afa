//! Diagnostic model: stable ids, severities, text edits, suggested fixes,
//! and the central reporter that applies the suppression policy.

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;

/// Stable diagnostic identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticId {
    /// MTLOG001 — template/argument count mismatch.
    TemplateMismatch,
    /// MTLOG002 — invalid format specifier.
    FormatSpecifier,
    /// MTLOG003 — duplicate property.
    DuplicateProperty,
    /// MTLOG004 — property naming.
    PropertyNaming,
    /// MTLOG005 — capturing hints.
    CapturingHints,
    /// MTLOG006 — error-level logging without an error value.
    ErrorLogging,
    /// MTLOG007 — context key constant suggestion.
    ContextKey,
    /// MTLOG008 — dynamic (non-literal) template.
    DynamicTemplate,
    /// MTLOG009 — With() odd argument count.
    WithOddArgs,
    /// MTLOG010 — With() non-string key.
    WithNonStringKey,
    /// MTLOG011 — With() empty key.
    WithEmptyKey,
    /// MTLOG012 — With() reserved property name.
    WithReservedProp,
}

impl DiagnosticId {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticId::TemplateMismatch => "MTLOG001",
            DiagnosticId::FormatSpecifier => "MTLOG002",
            DiagnosticId::DuplicateProperty => "MTLOG003",
            DiagnosticId::PropertyNaming => "MTLOG004",
            DiagnosticId::CapturingHints => "MTLOG005",
            DiagnosticId::ErrorLogging => "MTLOG006",
            DiagnosticId::ContextKey => "MTLOG007",
            DiagnosticId::DynamicTemplate => "MTLOG008",
            DiagnosticId::WithOddArgs => "MTLOG009",
            DiagnosticId::WithNonStringKey => "MTLOG010",
            DiagnosticId::WithEmptyKey => "MTLOG011",
            DiagnosticId::WithReservedProp => "MTLOG012",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let id = match code.trim().to_uppercase().as_str() {
            "MTLOG001" => DiagnosticId::TemplateMismatch,
            "MTLOG002" => DiagnosticId::FormatSpecifier,
            "MTLOG003" => DiagnosticId::DuplicateProperty,
            "MTLOG004" => DiagnosticId::PropertyNaming,
            "MTLOG005" => DiagnosticId::CapturingHints,
            "MTLOG006" => DiagnosticId::ErrorLogging,
            "MTLOG007" => DiagnosticId::ContextKey,
            "MTLOG008" => DiagnosticId::DynamicTemplate,
            "MTLOG009" => DiagnosticId::WithOddArgs,
            "MTLOG010" => DiagnosticId::WithNonStringKey,
            "MTLOG011" => DiagnosticId::WithEmptyKey,
            "MTLOG012" => DiagnosticId::WithReservedProp,
            _ => return None,
        };
        Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
        }
    }
}

/// Replace the byte range [start, end) with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }

    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: text.into(),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            replacement: String::new(),
        }
    }
}

/// A titled set of non-overlapping text edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub title: String,
    pub edits: Vec<TextEdit>,
}

/// One reported problem in the analyzed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    /// Byte range of the primary location.
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based position for display.
    pub line: u32,
    pub column: u32,
    /// Formatted message: `[<id>] [severity: ]<text>`.
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fixes: Vec<SuggestedFix>,
}

/// Collects diagnostics for one pass, applying the suppression policy
/// centrally: kill switch, per-id suppression, error downgrade, and message
/// formatting.
#[derive(Debug)]
pub struct Reporter<'a> {
    config: &'a AnalyzerConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Report a diagnostic. `message` is the bare human text; the id and
    /// severity prefix are added here.
    #[allow(clippy::too_many_arguments)]
    pub fn report(
        &mut self,
        id: DiagnosticId,
        severity: Severity,
        span: (usize, usize),
        position: (u32, u32),
        message: impl Into<String>,
        fixes: Vec<SuggestedFix>,
    ) {
        if self.config.disable_all {
            return;
        }
        if self.config.suppressed.contains(&id) {
            return;
        }

        let mut severity = severity;
        if severity == Severity::Error && self.config.downgrade_errors {
            severity = Severity::Warning;
        }

        let text = message.into();
        let message = if severity == Severity::Error {
            format!("[{}] {}", id.code(), text)
        } else {
            format!("[{}] {}: {}", id.code(), severity.as_str(), text)
        };

        self.diagnostics.push(Diagnostic {
            id,
            severity,
            start_byte: span.0,
            end_byte: span.1,
            line: position.0,
            column: position.1,
            message,
            fixes,
        });
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
