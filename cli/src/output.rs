//! # Diagnostic Output
//!
//! Text, JSON, and fix-preview rendering for analyzer diagnostics.
//! The text format matches the usual compiler shape,
//! `path:line:col: message`, so editors can jump to locations.

use colored::Colorize;
use mtlog_analysis::{apply_edits, Diagnostic, Severity};
use serde_json::{json, Value};
use similar::TextDiff;

/// Analysis result for one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: String,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

fn colorize(message: &str, severity: Severity) -> String {
    match severity {
        Severity::Error => message.red().to_string(),
        Severity::Warning => message.yellow().to_string(),
        Severity::Suggestion => message.cyan().to_string(),
    }
}

/// Render one file's diagnostics as text lines.
pub fn render_text(report: &FileReport, show_fixes: bool) -> String {
    let mut out = String::new();
    for diag in &report.diagnostics {
        out.push_str(&format!(
            "{}:{}:{}: {}\n",
            report.path,
            diag.line,
            diag.column,
            colorize(&diag.message, diag.severity)
        ));

        if show_fixes {
            for fix in &diag.fixes {
                out.push_str(&format!("  {} {}\n", "fix:".green(), fix.title));
                out.push_str(&render_fix_diff(&report.source, fix));
            }
        }
    }
    out
}

/// Unified diff preview of one suggested fix, indented under its title.
fn render_fix_diff(source: &str, fix: &mtlog_analysis::SuggestedFix) -> String {
    let fixed = apply_edits(source, &fix.edits);
    let diff = TextDiff::from_lines(source, &fixed);

    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let line = change.value();
        match change.tag() {
            similar::ChangeTag::Delete => {
                out.push_str(&format!("  {}{}", "-".red(), line.red()));
            }
            similar::ChangeTag::Insert => {
                out.push_str(&format!("  {}{}", "+".green(), line.green()));
            }
            similar::ChangeTag::Equal => continue,
        }
        if !line.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Render all diagnostics as a JSON array, one object per diagnostic.
pub fn render_json(reports: &[FileReport]) -> Result<String, serde_json::Error> {
    let mut entries: Vec<Value> = Vec::new();
    for report in reports {
        for diag in &report.diagnostics {
            entries.push(json!({
                "path": report.path,
                "id": diag.id.code(),
                "severity": diag.severity.as_str(),
                "line": diag.line,
                "column": diag.column,
                "message": diag.message,
                "fixes": serde_json::to_value(&diag.fixes)?,
            }));
        }
    }
    serde_json::to_string_pretty(&entries)
}

/// Summary line: counts per severity.
pub fn render_summary(reports: &[FileReport]) -> String {
    let mut errors = 0;
    let mut warnings = 0;
    let mut suggestions = 0;
    for diag in reports.iter().flat_map(|r| &r.diagnostics) {
        match diag.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Suggestion => suggestions += 1,
        }
    }
    format!(
        "{} error(s), {} warning(s), {} suggestion(s) in {} file(s)",
        errors,
        warnings,
        suggestions,
        reports.len()
    )
}
