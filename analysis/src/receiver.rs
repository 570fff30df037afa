//! Receiver classification: decide whether a method call targets an mtlog
//! logger.
//!
//! Without a type checker the decision is a capability probe over names: the
//! method must be one of the known logging/context methods, and the receiver
//! is resolved through the per-file logger variable table built from
//! assignments. When nothing is known about the receiver the call stays
//! conservatively in scope; checks that need type facts skip individually.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::semantics::model::{is_likely_error_name, Assignment, MethodCall, ReceiverKind};

/// Logging methods, short and long aliases.
pub const LOGGING_METHODS: &[&str] = &[
    "Verbose", "V", "Debug", "D", "Information", "Info", "I", "Warning", "Warn", "W", "Error",
    "Err", "E", "Fatal", "F",
];

/// Methods that carry context properties rather than a template.
pub const CONTEXT_METHODS: &[&str] = &["ForContext", "With", "PushProperty"];

/// Error-family logging methods.
pub const ERROR_METHODS: &[&str] = &["Error", "Err", "E", "Fatal", "F"];

pub fn is_logging_method(name: &str) -> bool {
    LOGGING_METHODS.contains(&name)
}

pub fn is_relevant_method(name: &str) -> bool {
    is_logging_method(name) || CONTEXT_METHODS.contains(&name)
}

/// Error-family membership also covers `Error`-prefixed names such as
/// `Errorw`, though only exact logging-method names reach the checks.
pub fn is_error_method(name: &str) -> bool {
    ERROR_METHODS.contains(&name) || name.starts_with("Error")
}

/// How confident the classifier is that a receiver is an mtlog logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggerOrigin {
    /// Traced back to the mtlog package (factory call or derivation chain).
    ExactLibrary,
    /// Looks like a logger by method shape; accepted unless strict.
    LibraryByShape,
    /// Not a logger call as far as we can tell.
    Unknown,
}

/// Per-file table of logger variables, fed from assignments in source order.
#[derive(Debug, Default)]
pub struct LoggerTable {
    vars: HashMap<String, LoggerOrigin>,
}

impl LoggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name := call` when the right side yields a logger.
    pub fn record_assignment(&mut self, assign: &Assignment, mtlog_alias: Option<&str>) {
        let origin = self.origin_of_call(&assign.call, mtlog_alias);
        if origin != LoggerOrigin::Unknown {
            self.vars.insert(assign.name.clone(), origin);
        }
    }

    /// Origin of the value produced by a call chain.
    fn origin_of_call(&self, call: &MethodCall, mtlog_alias: Option<&str>) -> LoggerOrigin {
        match call.base_ident() {
            Some(base) if Some(base) == mtlog_alias => LoggerOrigin::ExactLibrary,
            Some(base) => match self.vars.get(base) {
                Some(origin) => *origin,
                // Derivations like x := something.With(...) keep looking
                // logger-shaped even when the base is unknown.
                None if call.chain().iter().any(|c| is_relevant_method(&c.method)) => {
                    LoggerOrigin::LibraryByShape
                }
                None => LoggerOrigin::Unknown,
            },
            None => LoggerOrigin::Unknown,
        }
    }

    /// Classify the receiver of a method call.
    pub fn classify(
        &self,
        call: &MethodCall,
        mtlog_alias: Option<&str>,
        strict_logger_types: bool,
    ) -> LoggerOrigin {
        if !is_relevant_method(&call.method) {
            return LoggerOrigin::Unknown;
        }

        let origin = match &call.receiver {
            ReceiverKind::Ident(name) => {
                if Some(name.as_str()) == mtlog_alias {
                    LoggerOrigin::ExactLibrary
                } else if let Some(origin) = self.vars.get(name) {
                    *origin
                } else if is_likely_error_name(name) {
                    // err.Error() is not a log call
                    LoggerOrigin::Unknown
                } else {
                    LoggerOrigin::LibraryByShape
                }
            }
            ReceiverKind::Call(inner) => {
                let origin = self.origin_of_call(inner, mtlog_alias);
                if origin == LoggerOrigin::Unknown {
                    LoggerOrigin::LibraryByShape
                } else {
                    origin
                }
            }
            ReceiverKind::Selector(text) => {
                let last = text.rsplit('.').next().unwrap_or(text);
                if is_likely_error_name(last) {
                    LoggerOrigin::Unknown
                } else {
                    LoggerOrigin::LibraryByShape
                }
            }
            ReceiverKind::Other => LoggerOrigin::LibraryByShape,
        };

        if strict_logger_types && origin != LoggerOrigin::ExactLibrary {
            return LoggerOrigin::Unknown;
        }
        origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ast::FileId;
    use crate::parse::go::parse_go_file;
    use crate::semantics::extract_semantics;
    use crate::semantics::model::{GoFileSemantics, SemanticEvent};

    fn semantics_of(source: &str) -> GoFileSemantics {
        let parsed = parse_go_file(FileId(0), "test.go", source).unwrap();
        extract_semantics(&parsed)
    }

    fn table_and_calls(sem: &GoFileSemantics) -> (LoggerTable, Vec<&MethodCall>) {
        let alias = sem.mtlog_alias().map(str::to_string);
        let mut table = LoggerTable::new();
        let mut calls = Vec::new();
        for event in &sem.events {
            match event {
                SemanticEvent::Assign(a) => table.record_assignment(a, alias.as_deref()),
                SemanticEvent::Call(c) => calls.push(c),
            }
        }
        (table, calls)
    }

    #[test]
    fn method_name_sets() {
        assert!(is_logging_method("Information"));
        assert!(is_logging_method("V"));
        assert!(is_relevant_method("ForContext"));
        assert!(is_relevant_method("With"));
        assert!(!is_relevant_method("Sprintf"));
        assert!(is_error_method("Fatal"));
        assert!(is_error_method("Errorw"));
        assert!(!is_error_method("Warning"));
        assert!(!is_error_method("Err2"));
    }

    #[test]
    fn factory_assignment_is_exact_library() {
        let sem = semantics_of(
            r#"package main

import "github.com/willibrandon/mtlog"

func main() {
    log := mtlog.New()
    log.Information("hello")
}
"#,
        );
        let alias = sem.mtlog_alias();
        let (table, calls) = table_and_calls(&sem);
        let info = calls.iter().find(|c| c.method == "Information").unwrap();
        assert_eq!(
            table.classify(info, alias, false),
            LoggerOrigin::ExactLibrary
        );
    }

    #[test]
    fn derived_logger_keeps_exact_origin() {
        let sem = semantics_of(
            r#"package main

import "github.com/willibrandon/mtlog"

func main() {
    log := mtlog.New()
    reqLog := log.With("k", 1)
    reqLog.Information("hello")
}
"#,
        );
        let alias = sem.mtlog_alias();
        let (table, calls) = table_and_calls(&sem);
        let info = calls
            .iter()
            .find(|c| c.method == "Information" && c.base_ident() == Some("reqLog"))
            .unwrap();
        assert_eq!(
            table.classify(info, alias, true),
            LoggerOrigin::ExactLibrary
        );
    }

    #[test]
    fn unknown_receiver_is_in_scope_by_shape() {
        let sem = semantics_of(
            r#"package main

func f(logger Logger) {
    logger.Warning("careful")
}
"#,
        );
        let (table, calls) = table_and_calls(&sem);
        assert_eq!(
            table.classify(calls[0], None, false),
            LoggerOrigin::LibraryByShape
        );
        // Strict mode rejects shape-only receivers.
        assert_eq!(table.classify(calls[0], None, true), LoggerOrigin::Unknown);
    }

    #[test]
    fn error_method_on_error_variable_is_not_a_log_call() {
        let sem = semantics_of(
            r#"package main

func f(err error) string {
    return err.Error()
}
"#,
        );
        let (table, calls) = table_and_calls(&sem);
        assert_eq!(table.classify(calls[0], None, false), LoggerOrigin::Unknown);
    }

    #[test]
    fn irrelevant_methods_are_unknown() {
        let sem = semantics_of(
            r#"package main

func f() {
    fmt.Println("x")
}
"#,
        );
        let (table, calls) = table_and_calls(&sem);
        assert_eq!(table.classify(calls[0], None, false), LoggerOrigin::Unknown);
    }

    #[test]
    fn struct_field_logger_accepted_by_shape() {
        let sem = semantics_of(
            r#"package main

func (s *Server) f() {
    s.logger.Information("from field")
}
"#,
        );
        let (table, calls) = table_and_calls(&sem);
        assert_eq!(
            table.classify(calls[0], None, false),
            LoggerOrigin::LibraryByShape
        );
    }

    #[test]
    fn package_function_push_property_is_exact() {
        let sem = semantics_of(
            r#"package main

import "github.com/willibrandon/mtlog"

func f(log Logger) {
    mtlog.PushProperty(log, "user_id", 1)
}
"#,
        );
        let alias = sem.mtlog_alias();
        let (table, calls) = table_and_calls(&sem);
        let push = calls.iter().find(|c| c.method == "PushProperty").unwrap();
        assert_eq!(
            table.classify(push, alias, false),
            LoggerOrigin::ExactLibrary
        );
    }
}
