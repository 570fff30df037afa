//! # Check Command
//!
//! Collects Go files, runs the analyzer over them in parallel, and
//! renders the diagnostics.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mtlog_analysis::{Analyzer, AnalyzerConfig, AnalyzerFlags, FileId, Severity};
use rayon::prelude::*;

use crate::exit_codes::{EXIT_FINDINGS_FOUND, EXIT_SUCCESS};
use crate::output::{self, FileReport};
use crate::workspace;

/// Arguments for the check command.
#[derive(Debug)]
pub struct CheckArgs {
    /// Files or directories to analyze.
    pub paths: Vec<PathBuf>,
    /// Analyzer flag values, passed through to the analysis crate.
    pub flags: AnalyzerFlags,
    /// Emit diagnostics as JSON instead of text.
    pub json: bool,
    /// Show a diff preview for each suggested fix.
    pub show_fixes: bool,
}

pub fn execute(args: CheckArgs) -> Result<i32> {
    let config = AnalyzerConfig::from_flags(&args.flags);
    let analyzer = Analyzer::new(config);

    let files = workspace::collect_go_files(&args.paths)?;
    if files.is_empty() {
        log::warn!("no Go files found under the given paths");
        return Ok(EXIT_SUCCESS);
    }
    log::debug!("analyzing {} Go file(s)", files.len());

    // Parse errors in one file must not hide results for the others, so
    // they are carried per file and surfaced after the parallel pass.
    let reports: Vec<Result<FileReport>> = files
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            let display = path.display().to_string();
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading {display}"))?;
            let diagnostics = analyzer
                .analyze_source(FileId(index as u64), &display, &source)
                .with_context(|| format!("analyzing {display}"))?;
            Ok(FileReport {
                path: display,
                source,
                diagnostics,
            })
        })
        .collect();

    let reports: Vec<FileReport> = reports.into_iter().collect::<Result<_>>()?;

    if args.json {
        println!("{}", output::render_json(&reports)?);
    } else {
        for report in &reports {
            print!("{}", output::render_text(report, args.show_fixes));
        }
        let total: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
        if total > 0 {
            eprintln!("{}", output::render_summary(&reports));
        }
    }

    let has_errors = reports
        .iter()
        .flat_map(|r| &r.diagnostics)
        .any(|d| d.severity == Severity::Error);

    Ok(if has_errors {
        EXIT_FINDINGS_FOUND
    } else {
        EXIT_SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    fn check_args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            flags: AnalyzerFlags::default(),
            json: false,
            show_fixes: false,
        }
    }

    #[test]
    fn clean_project_exits_zero() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "main.go",
            "package main\n\nfunc f(log Logger) {\n\tlog.Information(\"User {UserId}\", 1)\n}\n",
        );

        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn error_diagnostics_exit_nonzero() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "main.go",
            "package main\n\nfunc f(log Logger) {\n\tlog.Information(\"{A} {B}\", 1)\n}\n",
        );

        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_FINDINGS_FOUND);
    }

    #[test]
    fn with_shape_warnings_alone_exit_zero() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "main.go",
            "package main\n\nfunc f(log Logger) {\n\tlog.With(\"a\", 1, \"b\").Information(\"up\")\n}\n",
        );

        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn suggestions_alone_exit_zero() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "main.go",
            "package main\n\nfunc f(log Logger) {\n\tlog.Error(\"no error value\")\n}\n",
        );

        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn downgrade_errors_turns_exit_zero() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "main.go",
            "package main\n\nfunc f(log Logger) {\n\tlog.Information(\"{A} {B}\", 1)\n}\n",
        );

        let mut args = check_args(vec![temp.path().to_path_buf()]);
        args.flags.downgrade_errors = true;
        assert_eq!(execute(args).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn empty_directory_exits_zero() {
        let temp = TempDir::new().unwrap();
        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn vendored_mistakes_are_ignored() {
        let temp = TempDir::new().unwrap();
        create_file(
            temp.path(),
            "vendor/dep/dep.go",
            "package dep\n\nfunc f(log Logger) {\n\tlog.Information(\"{A} {B}\", 1)\n}\n",
        );

        let code = execute(check_args(vec![temp.path().to_path_buf()])).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }
}
