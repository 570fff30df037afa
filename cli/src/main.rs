//! # mtlog-analyzer CLI
//!
//! Static analysis for [mtlog](https://github.com/willibrandon/mtlog)
//! logging calls in Go code: template/argument mismatches, format
//! specifiers, property naming, capturing hints, and With() misuse.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze the current module
//! mtlog-analyzer .
//!
//! # Strict mode with JSON output
//! mtlog-analyzer --strict --json ./internal
//! ```

use std::path::PathBuf;

use clap::Parser;
use mtlog_analysis::AnalyzerFlags;
use mtlog_analyzer::commands;
use mtlog_analyzer::exit_codes::EXIT_INVALID_INPUT;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Warn);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mtlog-analyzer")]
#[command(about = "check for common mtlog mistakes", long_about = None)]
#[command(version)]
struct Cli {
    /// Files or directories to analyze
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Treat unknown format specifiers as errors
    #[arg(long)]
    strict: bool,

    /// Additional context keys that suggest a constant (comma-separated)
    #[arg(long, value_name = "KEYS")]
    common_keys: Option<String>,

    /// Check categories to disable (comma-separated), e.g. naming,capturing
    #[arg(long, value_name = "CHECKS")]
    disable: Option<String>,

    /// Suppress the dynamic-template warning
    #[arg(long)]
    ignore_dynamic_templates: bool,

    /// Only analyze receivers that resolve to the mtlog package
    #[arg(long)]
    strict_logger_types: bool,

    /// Report errors as warnings (for CI migrations)
    #[arg(long)]
    downgrade_errors: bool,

    /// Disable all diagnostics
    #[arg(long)]
    disable_all: bool,

    /// Diagnostic ids to suppress (comma-separated), e.g. MTLOG001,MTLOG004
    #[arg(long, value_name = "IDS")]
    suppress: Option<String>,

    /// Reserved property names for the With() check (comma-separated)
    #[arg(long, value_name = "NAMES")]
    reserved_props: Option<String>,

    /// Enable the With() reserved-property check
    #[arg(long)]
    check_reserved: bool,

    /// Output diagnostics as JSON
    #[arg(long)]
    json: bool,

    /// Show a diff preview for each suggested fix
    #[arg(long)]
    show_fixes: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let flags = AnalyzerFlags {
        strict: cli.strict,
        common_keys: cli.common_keys,
        disable: cli.disable,
        ignore_dynamic_templates: cli.ignore_dynamic_templates,
        strict_logger_types: cli.strict_logger_types,
        downgrade_errors: cli.downgrade_errors,
        disable_all: cli.disable_all,
        suppress: cli.suppress,
        reserved_props: cli.reserved_props,
        check_reserved: cli.check_reserved,
    };

    let args = commands::check::CheckArgs {
        paths: cli.paths,
        flags,
        json: cli.json,
        show_fixes: cli.show_fixes,
    };

    let exit_code = match commands::check::execute(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("mtlog-analyzer: {e:#}");
            EXIT_INVALID_INPUT
        }
    };
    std::process::exit(exit_code);
}
