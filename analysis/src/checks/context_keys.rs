//! Common context keys that deserve a named constant (MTLOG007).

use crate::analyzer::AnalyzerPass;
use crate::diagnostics::{DiagnosticId, Severity};
use crate::fixes::{context_key_fix, KeyOccurrence};
use crate::semantics::model::{CallArg, GoFileSemantics, MethodCall, ReceiverKind, SemanticEvent};

/// Flag string-literal keys in `ForContext` pairs and `mtlog.PushProperty`
/// that case-insensitively match a configured common key.
pub(crate) fn check_context_usage(pass: &mut AnalyzerPass, call: &MethodCall) {
    let alias = pass.sem.mtlog_alias().unwrap_or("mtlog");

    match call.method.as_str() {
        "ForContext" => {
            let mut i = 0;
            while i + 1 < call.args.len() {
                check_key_argument(pass, &call.args[i]);
                i += 2;
            }
        }
        "PushProperty" if is_package_call(call, alias) => {
            if let Some(key_arg) = call.args.get(1) {
                check_key_argument(pass, key_arg);
            }
        }
        _ => {}
    }
}

fn check_key_argument(pass: &mut AnalyzerPass, key_arg: &CallArg) {
    let Some(key) = key_arg.string_value() else {
        return;
    };
    let is_common = pass
        .config
        .common_keys
        .iter()
        .any(|common| common.eq_ignore_ascii_case(key));
    if !is_common {
        return;
    }

    let occurrences = key_occurrences(pass.sem, key);
    let site = KeyOccurrence {
        start_byte: key_arg.start_byte,
        end_byte: key_arg.end_byte,
    };
    let fix = context_key_fix(pass.sem, key, site, &occurrences);

    pass.reporter.report(
        DiagnosticId::ContextKey,
        Severity::Suggestion,
        (key_arg.start_byte, key_arg.end_byte),
        (key_arg.line, key_arg.column),
        format!("consider defining a constant for commonly used context key '{key}'"),
        vec![fix],
    );
}

fn is_package_call(call: &MethodCall, alias: &str) -> bool {
    matches!(&call.receiver, ReceiverKind::Ident(name) if name == alias)
}

/// Every string-literal use of `key` at a context call site in the file.
fn key_occurrences(sem: &GoFileSemantics, key: &str) -> Vec<KeyOccurrence> {
    let alias = sem.mtlog_alias().unwrap_or("mtlog");
    let mut occurrences = Vec::new();

    let mut visit = |call: &MethodCall| match call.method.as_str() {
        "ForContext" => {
            let mut i = 0;
            while i + 1 < call.args.len() {
                if call.args[i].string_value() == Some(key) {
                    occurrences.push(KeyOccurrence {
                        start_byte: call.args[i].start_byte,
                        end_byte: call.args[i].end_byte,
                    });
                }
                i += 2;
            }
        }
        "PushProperty" if is_package_call(call, alias) => {
            if let Some(arg) = call.args.get(1) {
                if arg.string_value() == Some(key) {
                    occurrences.push(KeyOccurrence {
                        start_byte: arg.start_byte,
                        end_byte: arg.end_byte,
                    });
                }
            }
        }
        _ => {}
    };

    for event in &sem.events {
        match event {
            SemanticEvent::Call(call) => visit(call),
            SemanticEvent::Assign(assign) => visit(&assign.call),
        }
    }

    occurrences.sort_by_key(|occ| occ.start_byte);
    occurrences.dedup_by_key(|occ| occ.start_byte);
    occurrences
}
