//! In-template property checks: duplicates (MTLOG003), naming (MTLOG004),
//! and capturing hints (MTLOG005).

use std::collections::HashSet;

use crate::analyzer::AnalyzerPass;
use crate::diagnostics::{DiagnosticId, Severity, SuggestedFix, TextEdit};
use crate::idents::to_pascal_case;
use crate::semantics::model::{MethodCall, TypeClass};
use crate::template::{Property, Sigil};

/// Same base name appearing twice in one template.
pub(crate) fn check_duplicate_properties(
    pass: &mut AnalyzerPass,
    call: &MethodCall,
    template: &str,
) {
    let properties = parsed_properties(pass, template);
    let mut seen = HashSet::new();

    for property in &properties {
        let name = property.base_name();
        if !seen.insert(name.to_string()) {
            pass.reporter.report(
                DiagnosticId::DuplicateProperty,
                Severity::Error,
                (call.start_byte, call.end_byte),
                (call.line, call.column),
                format!("duplicate property '{name}' in template"),
                vec![],
            );
        }
    }
}

/// Empty, space-containing, and digit-leading names are errors; lowercase
/// names get a PascalCase suggestion, at most once per name per call.
pub(crate) fn check_property_naming(pass: &mut AnalyzerPass, call: &MethodCall, template: &str) {
    let properties = parsed_properties(pass, template);
    let mut suggested = HashSet::new();

    for property in &properties {
        let name = property.base_name();

        if name.is_empty() {
            pass.reporter.report(
                DiagnosticId::PropertyNaming,
                Severity::Error,
                (call.start_byte, call.end_byte),
                (call.line, call.column),
                "empty property name in template",
                vec![],
            );
            continue;
        }
        if name.contains(' ') {
            pass.reporter.report(
                DiagnosticId::PropertyNaming,
                Severity::Error,
                (call.start_byte, call.end_byte),
                (call.line, call.column),
                format!("property name '{name}' contains spaces"),
                vec![],
            );
            continue;
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            pass.reporter.report(
                DiagnosticId::PropertyNaming,
                Severity::Error,
                (call.start_byte, call.end_byte),
                (call.line, call.column),
                format!("property name '{name}' starts with a number"),
                vec![],
            );
            continue;
        }

        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            continue;
        }
        // OTEL-style dotted names follow their own convention.
        if name.contains('.') {
            continue;
        }
        if !suggested.insert(name.to_string()) {
            continue;
        }

        let pascal = to_pascal_case(name);
        let with_sigil = property.name_with_sigil();
        let renamed = with_sigil.replacen(name, &pascal, 1);
        let fix = SuggestedFix {
            title: format!("Change '{name}' to '{pascal}'"),
            edits: vec![rewrite_literal(call, with_sigil, &renamed)],
        };
        pass.reporter.report(
            DiagnosticId::PropertyNaming,
            Severity::Suggestion,
            (call.start_byte, call.end_byte),
            (call.line, call.column),
            format!("consider using PascalCase for property '{name}'"),
            vec![fix],
        );
    }
}

/// Align each property with its argument and validate the capturing sigil
/// against the argument's type class. Unknown classes are skipped.
pub(crate) fn check_capturing_usage(pass: &mut AnalyzerPass, call: &MethodCall, template: &str) {
    if call.args.len() < 2 {
        return;
    }
    let properties = parsed_properties(pass, template);

    for (i, property) in properties.iter().enumerate() {
        let Some(arg) = call.args.get(i + 1) else {
            break;
        };
        let class = arg.kind.type_class();
        if class == TypeClass::Unknown || class == TypeClass::Nil {
            continue;
        }
        let shown = arg
            .kind
            .type_display()
            .unwrap_or_else(|| arg.kind.describe());
        let with_sigil = property.name_with_sigil();
        let span = (arg.start_byte, arg.end_byte);
        let position = (arg.line, arg.column);

        match property.sigil() {
            Some(Sigil::Capture) => {
                if class == TypeClass::Basic || class == TypeClass::Str {
                    let bare = with_sigil.trim_start_matches('@');
                    let fix = SuggestedFix {
                        title: format!("Remove @ prefix from '{with_sigil}'"),
                        edits: vec![rewrite_literal(call, with_sigil, bare)],
                    };
                    pass.reporter.report(
                        DiagnosticId::CapturingHints,
                        Severity::Warning,
                        span,
                        position,
                        format!("using @ prefix for basic type {shown}, consider removing prefix"),
                        vec![fix],
                    );
                }
            }
            Some(Sigil::Scalar) => {
                if class == TypeClass::Complex {
                    let captured = format!("@{}", with_sigil.trim_start_matches('$'));
                    let fix = SuggestedFix {
                        title: format!("Change '$' to '@' prefix for '{with_sigil}'"),
                        edits: vec![rewrite_literal(call, with_sigil, &captured)],
                    };
                    pass.reporter.report(
                        DiagnosticId::CapturingHints,
                        Severity::Warning,
                        span,
                        position,
                        format!(
                            "using $ prefix for complex type {shown}, consider using @ for capturing"
                        ),
                        vec![fix],
                    );
                }
            }
            None => {
                if class == TypeClass::Complex {
                    let captured = format!("@{with_sigil}");
                    let fix = SuggestedFix {
                        title: format!("Add @ prefix to '{with_sigil}' for capturing"),
                        edits: vec![rewrite_literal(call, with_sigil, &captured)],
                    };
                    pass.reporter.report(
                        DiagnosticId::CapturingHints,
                        Severity::Suggestion,
                        span,
                        position,
                        format!(
                            "consider using @ prefix for complex type {shown} to enable capturing"
                        ),
                        vec![fix],
                    );
                }
            }
        }
    }
}

fn parsed_properties(pass: &mut AnalyzerPass, template: &str) -> Vec<Property> {
    pass.templates
        .get(template, pass.config.strict)
        .clone()
        .unwrap_or_default()
}

/// Rewrite the whole template literal, replacing every `{old` with `{new`.
fn rewrite_literal(call: &MethodCall, old: &str, new: &str) -> TextEdit {
    let literal = &call.args[0];
    let rewritten = literal
        .text
        .replace(&format!("{{{old}"), &format!("{{{new}"));
    TextEdit::replace(literal.start_byte, literal.end_byte, rewritten)
}
