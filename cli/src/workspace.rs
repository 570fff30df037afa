//! # Workspace Scanning
//!
//! Collects the Go files to analyze from the paths given on the command
//! line. Directories are walked recursively, honoring .gitignore, and
//! `vendor` and `testdata` trees are skipped the way go vet skips them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;

/// Directories never descended into, regardless of gitignore rules.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

fn should_skip_directory(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name)
}

fn is_go_file(path: &Path) -> bool {
    path.extension().map(|ext| ext == "go").unwrap_or(false)
}

/// Collect Go files under each input path, deduplicated and sorted.
///
/// A path naming a file is taken as-is when it is a Go file; a directory
/// is walked recursively. Nonexistent paths are an error.
pub fn collect_go_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            bail!("path does not exist: {}", path.display());
        }

        if path.is_file() {
            if is_go_file(path) {
                files.push(path.clone());
            } else {
                log::warn!("skipping non-Go file: {}", path.display());
            }
            continue;
        }

        let walker = WalkBuilder::new(path)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    let name = entry.file_name().to_string_lossy();
                    !should_skip_directory(&name)
                } else {
                    true
                }
            })
            .build();

        for entry in walker {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
                && is_go_file(entry.path())
            {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
