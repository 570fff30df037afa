use thiserror::Error;

/// Errors surfaced by the analysis crate.
///
/// Problems found in the source under analysis are never errors; they are
/// reported as diagnostics. This type only covers failures of the analyzer
/// machinery itself.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// A message template that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed property brace at position {position}")]
    UnclosedBrace { position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_error_display() {
        let err = TemplateError::UnclosedBrace { position: 7 };
        assert_eq!(err.to_string(), "unclosed property brace at position 7");
    }

    #[test]
    fn analysis_error_display() {
        let err = AnalysisError::Parse("bad".into());
        assert_eq!(err.to_string(), "parse error: bad");
    }
}
