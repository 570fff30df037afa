//! Template/argument arity (MTLOG001), format specifiers (MTLOG002), and the
//! dynamic-template warning (MTLOG008).

use crate::analyzer::AnalyzerPass;
use crate::diagnostics::{DiagnosticId, Severity, SuggestedFix, TextEdit};
use crate::fixes::{argument_insert_point, todo_comment_edit};
use crate::format::{suggest_format, validate_format, FormatValidity};
use crate::receiver::is_error_method;
use crate::semantics::model::{MethodCall, TypeClass};
use crate::template::Property;

use super::literal_template;

/// Validate property count against argument count and, when the counts line
/// up, every property's format specifier.
pub(crate) fn check_template_arguments(pass: &mut AnalyzerPass, call: &MethodCall) {
    let Some(template_arg) = call.args.first() else {
        return;
    };

    let Some(template) = literal_template(template_arg) else {
        if !pass.config.ignore_dynamic_templates {
            pass.reporter.report(
                DiagnosticId::DynamicTemplate,
                Severity::Warning,
                (template_arg.start_byte, template_arg.end_byte),
                (template_arg.line, template_arg.column),
                "dynamic template strings are not analyzed",
                vec![],
            );
        }
        return;
    };

    if pass.config.is_disabled("template") {
        return;
    }

    let properties = match pass.templates.get(template, pass.config.strict).clone() {
        Ok(properties) => properties,
        Err(err) => {
            pass.reporter.report(
                DiagnosticId::TemplateMismatch,
                Severity::Error,
                (template_arg.start_byte, template_arg.end_byte),
                (template_arg.line, template_arg.column),
                format!("invalid template: {err}"),
                vec![],
            );
            return;
        }
    };

    let arg_count = call.args.len() - 1;

    // Error-family methods accept one trailing error beyond the properties.
    if is_error_method(&call.method) && arg_count == properties.len() + 1 {
        let last = &call.args[call.args.len() - 1];
        match last.kind.type_class() {
            TypeClass::Error | TypeClass::Unknown | TypeClass::Nil => {}
            _ => {
                let shown = last
                    .kind
                    .type_display()
                    .unwrap_or_else(|| last.kind.describe());
                pass.reporter.report(
                    DiagnosticId::ErrorLogging,
                    Severity::Error,
                    (last.start_byte, last.end_byte),
                    (last.line, last.column),
                    format!(
                        "last argument to {} method should be an error, got {shown}",
                        call.method
                    ),
                    vec![],
                );
            }
        }
        return;
    }

    if properties.len() != arg_count {
        let fixes = mismatch_fixes(pass, call, &properties, arg_count);
        pass.reporter.report(
            DiagnosticId::TemplateMismatch,
            Severity::Error,
            (call.start_byte, call.end_byte),
            (call.line, call.column),
            format!(
                "template has {} properties but {arg_count} arguments provided",
                properties.len()
            ),
            fixes,
        );
        return;
    }

    for property in &properties {
        if let FormatValidity::Unknown(invalid) = validate_format(&property.raw) {
            if !pass.config.strict {
                continue;
            }
            let fixes = format_fix(template_arg.start_byte, property, &invalid);
            pass.reporter.report(
                DiagnosticId::FormatSpecifier,
                Severity::Error,
                (call.start_byte, call.end_byte),
                (call.line, call.column),
                format!(
                    "invalid format specifier in property '{}': unknown format specifier: {invalid}",
                    property.raw
                ),
                fixes,
            );
        }
    }
}

fn mismatch_fixes(
    pass: &mut AnalyzerPass,
    call: &MethodCall,
    properties: &[Property],
    arg_count: usize,
) -> Vec<SuggestedFix> {
    if arg_count < properties.len() {
        let missing = properties.len() - arg_count;
        let placeholders = vec!["nil"; missing].join(", ");
        let missing_props: Vec<&str> = properties[arg_count..]
            .iter()
            .map(|p| p.raw.as_str())
            .collect();

        let todo = todo_comment_edit(
            pass.sem,
            call,
            &mut pass.lines,
            call.end_byte,
            &format!("TODO: provide value for {}", missing_props.join(", ")),
        );
        let at = argument_insert_point(pass.source, call.end_byte);
        return vec![SuggestedFix {
            title: format!("Add {missing} missing argument(s)"),
            edits: vec![TextEdit::insert(at, format!(", {placeholders}")), todo],
        }];
    }

    // Surplus arguments: delete everything past the last expected one. With
    // zero properties there is no anchor argument, so no fix is offered.
    if properties.is_empty() {
        return vec![];
    }
    let last_valid = &call.args[properties.len()];
    let last = &call.args[call.args.len() - 1];
    vec![SuggestedFix {
        title: format!("Remove {} extra argument(s)", arg_count - properties.len()),
        edits: vec![TextEdit::delete(last_valid.end_byte, last.end_byte)],
    }]
}

/// Byte-exact rewrite of one property's format suffix inside the literal.
fn format_fix(literal_start: usize, property: &Property, invalid: &str) -> Vec<SuggestedFix> {
    let Some(suggested) = suggest_format(invalid) else {
        return vec![];
    };
    let start = literal_start + 1 + property.offset;
    let end = start + property.raw.len();
    let replacement = format!("{}:{suggested}", property.name_with_sigil());
    vec![SuggestedFix {
        title: format!("Change format from ':{invalid}' to ':{suggested}'"),
        edits: vec![TextEdit::replace(start, end, replacement)],
    }]
}
