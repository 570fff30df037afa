//! Analyzer entry point and the per-file coordinator.
//!
//! One pass walks the file's event stream once. Assignments feed the logger
//! table and the cross-call tracker; calls are classified and routed through
//! the per-call checks in a fixed order. Cross-call overrides are flushed
//! after the walk.

use crate::checks;
use crate::config::AnalyzerConfig;
use crate::crosscall::CrossCallTracker;
use crate::diagnostics::{Diagnostic, Reporter};
use crate::error::AnalysisError;
use crate::fixes::LineIndex;
use crate::parse::ast::{FileId, ParsedFile};
use crate::receiver::{is_logging_method, LoggerOrigin, LoggerTable};
use crate::semantics::extract_semantics;
use crate::semantics::model::{GoFileSemantics, MethodCall, SemanticEvent};
use crate::template::TemplateCache;

/// Analyzer name, as registered with drivers.
pub const ANALYZER_NAME: &str = "mtlog";
/// One-line analyzer description.
pub const ANALYZER_DOC: &str = "check for common mtlog mistakes";

/// The analyzer handle: a configuration plus the run entry points.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse and analyze one Go source file.
    pub fn analyze_source(
        &self,
        file_id: FileId,
        path: &str,
        source: &str,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        if self.config.disable_all {
            return Ok(Vec::new());
        }
        let parsed = crate::parse::go::parse_go_file(file_id, path, source)?;
        Ok(self.analyze_parsed(&parsed))
    }

    /// Analyze an already-parsed file.
    pub fn analyze_parsed(&self, parsed: &ParsedFile) -> Vec<Diagnostic> {
        if self.config.disable_all {
            return Vec::new();
        }
        let sem = extract_semantics(parsed);
        let mut pass = AnalyzerPass::new(&self.config, &sem, parsed.source.as_str());
        pass.run();
        pass.into_diagnostics()
    }
}

/// State for one file's analysis pass. Checks live in [`crate::checks`] and
/// reach the caches and the reporter through this struct.
pub(crate) struct AnalyzerPass<'a> {
    pub(crate) config: &'a AnalyzerConfig,
    pub(crate) sem: &'a GoFileSemantics,
    pub(crate) source: &'a str,
    pub(crate) reporter: Reporter<'a>,
    pub(crate) templates: TemplateCache,
    pub(crate) lines: LineIndex<'a>,
    loggers: LoggerTable,
    crosscall: CrossCallTracker,
}

impl<'a> AnalyzerPass<'a> {
    pub(crate) fn new(
        config: &'a AnalyzerConfig,
        sem: &'a GoFileSemantics,
        source: &'a str,
    ) -> Self {
        Self {
            config,
            sem,
            source,
            reporter: Reporter::new(config),
            templates: TemplateCache::new(),
            lines: LineIndex::new(source),
            loggers: LoggerTable::new(),
            crosscall: CrossCallTracker::new(),
        }
    }

    pub(crate) fn run(&mut self) {
        let sem = self.sem;
        let alias = sem.mtlog_alias();
        let track_cross_call = !self.config.is_disabled("with-cross-call");

        for event in &sem.events {
            match event {
                SemanticEvent::Assign(assign) => {
                    if track_cross_call
                        && self
                            .loggers
                            .classify(&assign.call, alias, self.config.strict_logger_types)
                            != LoggerOrigin::Unknown
                    {
                        // Check against the pre-assignment state, then fold
                        // the call's keys into the assigned variable.
                        self.crosscall.check_call(&assign.call);
                        self.crosscall.record_assignment(assign);
                    }
                    self.loggers.record_assignment(assign, alias);
                }
                SemanticEvent::Call(call) => self.check_call(call, alias, track_cross_call),
            }
        }

        if track_cross_call {
            self.crosscall.flush(&mut self.reporter);
        }
    }

    fn check_call(&mut self, call: &MethodCall, alias: Option<&str>, track_cross_call: bool) {
        let origin = self
            .loggers
            .classify(call, alias, self.config.strict_logger_types);
        if origin == LoggerOrigin::Unknown {
            return;
        }

        if track_cross_call {
            self.crosscall.check_call(call);
        }

        if !self.config.is_disabled("context") {
            checks::context_keys::check_context_usage(self, call);
        }

        // With() carries no template; its shape checks stand alone.
        if call.method == "With" {
            checks::with_args::check_with_arguments(self, call);
            return;
        }

        if !is_logging_method(&call.method) {
            return;
        }
        if call.args.is_empty() {
            return;
        }

        checks::template_args::check_template_arguments(self, call);

        // Remaining checks need a literal template.
        let Some(template) = checks::literal_template(&call.args[0]) else {
            return;
        };

        if !self.config.is_disabled("duplicate") {
            checks::properties::check_duplicate_properties(self, call, template);
        }
        if !self.config.is_disabled("naming") {
            checks::properties::check_property_naming(self, call, template);
        }
        if !self.config.is_disabled("capturing") {
            checks::properties::check_capturing_usage(self, call, template);
        }
        if !self.config.is_disabled("error") {
            checks::error_logging::check_error_logging(self, call);
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reporter.into_diagnostics()
    }
}
