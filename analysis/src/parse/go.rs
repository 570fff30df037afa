use std::sync::Arc;

use tree_sitter::{Language as TsLanguage, Parser};

use crate::error::AnalysisError;
use crate::parse::ast::{FileId, ParsedFile};

fn go_language() -> TsLanguage {
    tree_sitter_go::LANGUAGE.into()
}

/// Parse a Go source file into a `ParsedFile`.
pub fn parse_go_file(file_id: FileId, path: &str, source: &str) -> Result<ParsedFile, AnalysisError> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let source = Arc::new(source.to_string());
    let tree = parser
        .parse(&**source, None)
        .ok_or_else(|| AnalysisError::Parse(format!("failed to parse Go source: {path}")))?;

    Ok(ParsedFile {
        file_id,
        path: path.to_string(),
        source,
        tree,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_language_is_valid() {
        let lang = go_language();
        assert!(lang.abi_version() > 0);
    }

    #[test]
    fn parses_simple_package() {
        let parsed = parse_go_file(FileId(1), "test.go", "package main").unwrap();
        assert_eq!(parsed.tree.root_node().kind(), "source_file");
        assert!(!parsed.tree.root_node().has_error());
    }

    #[test]
    fn parses_logging_call() {
        let code = r#"
package main

import "github.com/willibrandon/mtlog"

func main() {
    log := mtlog.New()
    log.Information("User {UserId} logged in", 42)
}
"#;
        let parsed = parse_go_file(FileId(2), "main.go", code).unwrap();
        assert!(!parsed.tree.root_node().has_error());
    }

    #[test]
    fn tolerates_syntax_errors() {
        // tree-sitter produces a best-effort tree rather than failing outright
        let parsed = parse_go_file(FileId(3), "broken.go", "package main\nfunc {").unwrap();
        assert!(parsed.tree.root_node().has_error());
    }
}
