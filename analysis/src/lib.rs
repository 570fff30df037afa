//! Static analysis for [mtlog](https://github.com/willibrandon/mtlog)
//! logging calls in Go source.
//!
//! The crate parses Go files with tree-sitter, extracts a lightweight
//! semantic model (imports, constants, function scopes, and an ordered
//! stream of assignments and method calls), classifies receivers to find
//! logger calls, and runs the MTLOG001..MTLOG012 checks over them. Every
//! diagnostic carries a stable id, a severity, a position, and, where
//! feasible, byte-exact suggested fixes.
//!
//! [`Analyzer`] is the entry point:
//!
//! ```
//! use mtlog_analysis::{Analyzer, AnalyzerConfig, FileId};
//!
//! let analyzer = Analyzer::new(AnalyzerConfig::default());
//! let source = r#"package main
//!
//! func f(log Logger) {
//!     log.Information("User {UserId} logged in", 42, "extra")
//! }
//! "#;
//! let diagnostics = analyzer.analyze_source(FileId(0), "main.go", source).unwrap();
//! assert_eq!(diagnostics[0].message,
//!     "[MTLOG001] template has 1 properties but 2 arguments provided");
//! ```

mod analyzer;
mod checks;
pub mod config;
mod crosscall;
pub mod diagnostics;
pub mod error;
pub mod fixes;
pub mod format;
pub mod idents;
pub mod parse;
pub mod receiver;
pub mod semantics;
pub mod template;

pub use analyzer::{Analyzer, ANALYZER_DOC, ANALYZER_NAME};
pub use config::{AnalyzerConfig, AnalyzerFlags, SUPPRESS_ENV_VAR};
pub use diagnostics::{Diagnostic, DiagnosticId, Severity, SuggestedFix, TextEdit};
pub use error::AnalysisError;
pub use fixes::apply_edits;
pub use parse::ast::FileId;
