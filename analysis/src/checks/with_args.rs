//! With() argument shape: odd counts (MTLOG009), non-string keys (MTLOG010),
//! empty keys (MTLOG011), in-call duplicates (MTLOG003), and reserved
//! property names (MTLOG012).

use std::collections::HashMap;

use crate::analyzer::AnalyzerPass;
use crate::diagnostics::{DiagnosticId, Severity, SuggestedFix, TextEdit};
use crate::idents::to_snake_case;
use crate::semantics::model::{ArgKind, CallArg, GoFileSemantics, MethodCall};

pub(crate) fn check_with_arguments(pass: &mut AnalyzerPass, call: &MethodCall) {
    // With() with no arguments is valid.
    if call.args.is_empty() {
        return;
    }
    let n = call.args.len();

    if !pass.config.is_disabled("with-odd") && n % 2 != 0 {
        pass.reporter.report(
            DiagnosticId::WithOddArgs,
            Severity::Warning,
            (call.start_byte, call.end_byte),
            (call.line, call.column),
            format!("With() requires an even number of arguments (key-value pairs), got {n}"),
            odd_args_fixes(call),
        );
    }

    let mut seen_keys: HashMap<String, usize> = HashMap::new();

    let mut i = 0;
    while i < n {
        let key_arg = &call.args[i];
        let key_value = resolved_string(pass.sem, key_arg);

        if !pass.config.is_disabled("with-nonstring") && is_known_non_string(pass.sem, key_arg) {
            pass.reporter.report(
                DiagnosticId::WithNonStringKey,
                Severity::Warning,
                (key_arg.start_byte, key_arg.end_byte),
                (key_arg.line, key_arg.column),
                format!("With() key must be a string, got {}", key_arg.kind.describe()),
                non_string_key_fixes(key_arg),
            );
            i += 2;
            continue;
        }

        let Some(key) = key_value else {
            // String-shaped but value unknown at analysis time.
            i += 2;
            continue;
        };

        if key.is_empty() {
            if !pass.config.is_disabled("with-empty")
                && matches!(key_arg.kind, ArgKind::StringLit { .. })
            {
                pass.reporter.report(
                    DiagnosticId::WithEmptyKey,
                    Severity::Warning,
                    (key_arg.start_byte, key_arg.end_byte),
                    (key_arg.line, key_arg.column),
                    "With() key is empty and will be ignored",
                    empty_key_fixes(call, i),
                );
            }
            i += 2;
            continue;
        }

        if !pass.config.is_disabled("duplicate") {
            if let Some(prev) = seen_keys.get(&key) {
                pass.reporter.report(
                    DiagnosticId::DuplicateProperty,
                    Severity::Warning,
                    (key_arg.start_byte, key_arg.end_byte),
                    (key_arg.line, key_arg.column),
                    format!(
                        "duplicate key '{key}' in With() call (previous at position {})",
                        prev / 2 + 1
                    ),
                    vec![],
                );
            } else {
                seen_keys.insert(key.clone(), i);
            }
        }

        if pass.config.check_reserved && is_reserved(pass, &key) {
            let fix = SuggestedFix {
                title: format!("Rename to 'Custom{key}' or 'User{key}'"),
                edits: vec![TextEdit::replace(
                    key_arg.start_byte,
                    key_arg.end_byte,
                    format!("\"User{key}\""),
                )],
            };
            pass.reporter.report(
                DiagnosticId::WithReservedProp,
                Severity::Suggestion,
                (key_arg.start_byte, key_arg.end_byte),
                (key_arg.line, key_arg.column),
                format!("property '{key}' shadows a built-in property"),
                vec![fix],
            );
        }

        i += 2;
    }
}

/// Two alternative repairs: complete the pair, or drop the dangling key.
fn odd_args_fixes(call: &MethodCall) -> Vec<SuggestedFix> {
    let last = &call.args[call.args.len() - 1];
    let mut fixes = vec![SuggestedFix {
        title: "Add empty string value for the last key".to_string(),
        edits: vec![TextEdit::insert(last.end_byte, ", \"\"")],
    }];
    if call.args.len() > 1 {
        let before_last = &call.args[call.args.len() - 2];
        fixes.push(SuggestedFix {
            title: "Remove the dangling key".to_string(),
            edits: vec![TextEdit::delete(before_last.end_byte, last.end_byte)],
        });
    }
    fixes
}

fn non_string_key_fixes(key_arg: &CallArg) -> Vec<SuggestedFix> {
    match &key_arg.kind {
        ArgKind::IntLit | ArgKind::FloatLit => vec![SuggestedFix {
            title: format!("Convert {} to string", key_arg.text),
            edits: vec![TextEdit::replace(
                key_arg.start_byte,
                key_arg.end_byte,
                format!("\"{}\"", key_arg.text),
            )],
        }],
        ArgKind::Ident(name) => vec![SuggestedFix {
            title: format!("Use '{name}' as value with string key"),
            edits: vec![TextEdit::replace(
                key_arg.start_byte,
                key_arg.end_byte,
                format!("\"{}\", {name}", to_snake_case(name)),
            )],
        }],
        _ => vec![],
    }
}

/// Remove the empty pair along with one adjoining comma.
fn empty_key_fixes(call: &MethodCall, i: usize) -> Vec<SuggestedFix> {
    let Some(value_arg) = call.args.get(i + 1) else {
        return vec![];
    };
    let mut start = call.args[i].start_byte;
    let mut end = value_arg.end_byte;
    if i > 0 {
        start = call.args[i - 1].end_byte;
    } else if let Some(next) = call.args.get(i + 2) {
        end = next.start_byte;
    }
    vec![SuggestedFix {
        title: "Remove empty key-value pair".to_string(),
        edits: vec![TextEdit::delete(start, end)],
    }]
}

/// Key kinds that can never be strings. Identifiers count only when they
/// resolve to a file constant that is not a string constant.
fn is_known_non_string(sem: &GoFileSemantics, key_arg: &CallArg) -> bool {
    match &key_arg.kind {
        ArgKind::StringLit { .. } => false,
        ArgKind::IntLit
        | ArgKind::FloatLit
        | ArgKind::BoolLit
        | ArgKind::NilLit
        | ArgKind::Composite { .. } => true,
        ArgKind::Ident(name) => sem
            .consts
            .iter()
            .any(|c| c.name == *name && c.string_value.is_none()),
        ArgKind::Selector | ArgKind::FuncCall { .. } | ArgKind::Other => false,
    }
}

/// The compile-time string value of a key, through literals and file consts.
fn resolved_string(sem: &GoFileSemantics, key_arg: &CallArg) -> Option<String> {
    match &key_arg.kind {
        ArgKind::StringLit { value } => Some(value.clone()),
        ArgKind::Ident(name) => sem
            .consts
            .iter()
            .find(|c| c.name == *name)
            .and_then(|c| c.string_value.clone()),
        _ => None,
    }
}

fn is_reserved(pass: &AnalyzerPass, key: &str) -> bool {
    pass.config
        .reserved_properties()
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testutil::run_check;
    use crate::config::AnalyzerConfig;
    use crate::diagnostics::Diagnostic;
    use crate::fixes::apply_edits;

    fn check(config: &AnalyzerConfig, source: &str) -> Vec<Diagnostic> {
        run_check(config, source, "With", |pass, call| {
            check_with_arguments(pass, call)
        })
    }

    #[test]
    fn balanced_pairs_are_clean() {
        let source = r#"package main

func f(log Logger) {
	log.With("service", "api", "version", 2).Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        assert!(check(&config, source).is_empty());
    }

    #[test]
    fn no_arguments_is_valid() {
        let source = r#"package main

func f(log Logger) {
	log.With().Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        assert!(check(&config, source).is_empty());
    }

    #[test]
    fn odd_argument_count_offers_two_fixes() {
        let source = r#"package main

func f(log Logger) {
	log.With("a", 1, "b").Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "[MTLOG009] warning: With() requires an even number of arguments (key-value pairs), got 3"
        );
        assert_eq!(diags[0].fixes.len(), 2);

        let padded = apply_edits(source, &diags[0].fixes[0].edits);
        assert!(padded.contains(r#"log.With("a", 1, "b", "")"#));

        let trimmed = apply_edits(source, &diags[0].fixes[1].edits);
        assert!(trimmed.contains(r#"log.With("a", 1)"#));
    }

    #[test]
    fn numeric_key_gets_quoting_fix() {
        let source = r#"package main

func f(log Logger) {
	log.With(42, "value").Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "[MTLOG010] warning: With() key must be a string, got numeric literal"
        );
        let fix = &diags[0].fixes[0];
        assert_eq!(fix.title, "Convert 42 to string");
        let fixed = apply_edits(source, &fix.edits);
        assert!(fixed.contains(r#"log.With("42", "value")"#));
    }

    #[test]
    fn non_string_constant_key_gets_swap_fix() {
        let source = r#"package main

const maxRetries = 3

func f(log Logger) {
	log.With(maxRetries, "value").Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("got variable 'maxRetries'"));
        let fixed = apply_edits(source, &diags[0].fixes[0].edits);
        assert!(fixed.contains(r#"log.With("max_retries", maxRetries, "value")"#));
    }

    #[test]
    fn string_variable_keys_are_left_alone() {
        let source = r#"package main

func f(log Logger, key string) {
	log.With(key, "value").Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        assert!(check(&config, source).is_empty());
    }

    #[test]
    fn empty_key_in_first_pair_removes_trailing_comma() {
        let source = r#"package main

func f(log Logger) {
	log.With("", 1, "b", 2).Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "[MTLOG011] warning: With() key is empty and will be ignored"
        );
        let fixed = apply_edits(source, &diags[0].fixes[0].edits);
        assert!(fixed.contains(r#"log.With("b", 2)"#));
    }

    #[test]
    fn empty_key_in_later_pair_removes_leading_comma() {
        let source = r#"package main

func f(log Logger) {
	log.With("a", 1, "", 2).Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        let fixed = apply_edits(source, &diags[0].fixes[0].edits);
        assert!(fixed.contains(r#"log.With("a", 1)"#));
    }

    #[test]
    fn duplicate_keys_report_previous_position() {
        let source = r#"package main

func f(log Logger) {
	log.With("a", 1, "b", 2, "a", 3).Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "[MTLOG003] warning: duplicate key 'a' in With() call (previous at position 1)"
        );
    }

    #[test]
    fn duplicate_through_constant_key_is_found() {
        let source = r#"package main

const serviceKey = "service"

func f(log Logger) {
	log.With(serviceKey, "api", "service", "db").Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("duplicate key 'service'"));
    }

    #[test]
    fn reserved_keys_flagged_only_when_enabled() {
        let source = r#"package main

func f(log Logger, t Time) {
	log.With("Timestamp", t).Information("up")
}
"#;
        let config = AnalyzerConfig::default();
        assert!(check(&config, source).is_empty());

        let config = AnalyzerConfig {
            check_reserved: true,
            ..AnalyzerConfig::default()
        };
        let diags = check(&config, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "[MTLOG012] suggestion: property 'Timestamp' shadows a built-in property"
        );
        let fix = &diags[0].fixes[0];
        assert_eq!(fix.title, "Rename to 'CustomTimestamp' or 'UserTimestamp'");
        let fixed = apply_edits(source, &fix.edits);
        assert!(fixed.contains(r#"log.With("UserTimestamp", t)"#));
    }

    #[test]
    fn shape_findings_are_warnings_not_errors() {
        use crate::analyzer::Analyzer;
        use crate::diagnostics::Severity;
        use crate::parse::ast::FileId;

        let source = r#"package main

func f(log Logger) {
	log.With("a", 1, "b").Information("odd")
	log.With(42, "v").Information("key")
	log.With("", "v").Information("empty")
}
"#;
        let diags = Analyzer::new(AnalyzerConfig::default())
            .analyze_source(FileId(0), "test.go", source)
            .unwrap();
        assert_eq!(diags.len(), 3);
        for diag in &diags {
            assert_eq!(diag.severity, Severity::Warning, "{}", diag.message);
            assert!(diag.message.contains("warning: "), "{}", diag.message);
        }
    }

    #[test]
    fn categories_disable_independently() {
        let source = r#"package main

func f(log Logger) {
	log.With("a", 1, "b").Information("up")
}
"#;
        let mut config = AnalyzerConfig::default();
        config.disabled_checks.insert("with-odd".to_string());
        assert!(check(&config, source).is_empty());
    }
}
