//! Error-level logging without an error value (MTLOG006).

use crate::analyzer::AnalyzerPass;
use crate::diagnostics::{DiagnosticId, Severity, SuggestedFix, TextEdit};
use crate::fixes::{argument_insert_point, todo_comment_edit};
use crate::receiver::is_error_method;
use crate::semantics::model::{GoFileSemantics, MethodCall, TypeClass, VarDefine};

/// Lines above the call within which a recent `err :=` define still counts.
const RECENT_DEFINE_WINDOW: u32 = 5;

pub(crate) fn check_error_logging(pass: &mut AnalyzerPass, call: &MethodCall) {
    if !is_error_method(&call.method) {
        return;
    }

    // Arguments of unknown class may well be errors; stay quiet then.
    let has_error = call.args.iter().skip(1).any(|arg| {
        matches!(
            arg.kind.type_class(),
            TypeClass::Error | TypeClass::Unknown
        )
    });
    if has_error {
        return;
    }

    let error_var = find_error_variable(pass.sem, call);
    let param = error_var.as_deref().unwrap_or("nil");
    let at = argument_insert_point(pass.source, call.end_byte);
    let mut edits = vec![TextEdit::insert(at, format!(", {param}"))];

    if error_var.is_none() {
        let end_line = call.line
            + pass.source[call.start_byte..call.end_byte]
                .bytes()
                .filter(|&b| b == b'\n')
                .count() as u32;
        let line_end = pass
            .lines
            .line_end_byte(end_line)
            .unwrap_or(call.end_byte);
        edits.push(todo_comment_edit(
            pass.sem,
            call,
            &mut pass.lines,
            line_end,
            "TODO: replace nil with actual error",
        ));
    }

    pass.reporter.report(
        DiagnosticId::ErrorLogging,
        Severity::Suggestion,
        (call.start_byte, call.end_byte),
        (call.line, call.column),
        "Error level log without error value, consider including the error or using Warning level",
        vec![SuggestedFix {
            title: "Add error parameter".to_string(),
            edits,
        }],
    );
}

/// A plausible error identifier for the fix: error-typed parameters first,
/// then named error results, then a recent `:=` define with an error-ish
/// name, but only when the call sits inside an if block.
fn find_error_variable(sem: &GoFileSemantics, call: &MethodCall) -> Option<String> {
    let scope = sem.enclosing_function(call.start_byte)?;

    if let Some(name) = scope.error_params.first() {
        return Some(name.clone());
    }

    if !scope.in_if_block(call.start_byte, call.end_byte) {
        return None;
    }

    let mut best: Option<&VarDefine> = None;
    for define in &scope.defines {
        if define.line >= call.line {
            continue;
        }
        if call.line - define.line > RECENT_DEFINE_WINDOW {
            continue;
        }
        if !crate::semantics::model::is_likely_error_name(&define.name) {
            continue;
        }
        if best.is_none_or(|b| define.line > b.line) {
            best = Some(define);
        }
    }
    best.map(|d| d.name.clone())
}
