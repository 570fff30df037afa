//! Per-call checks.
//!
//! Each check is a free function taking the running [`AnalyzerPass`] and one
//! method call from the event stream. The coordinator decides which checks
//! run and in what order; checks only look at the call they are handed and
//! report through the pass reporter.
//!
//! [`AnalyzerPass`]: crate::analyzer::AnalyzerPass

pub(crate) mod context_keys;
pub(crate) mod error_logging;
pub(crate) mod properties;
pub(crate) mod template_args;
pub(crate) mod with_args;

use crate::semantics::model::{ArgKind, CallArg};

/// The template text of a string-literal argument, quotes stripped but
/// escape sequences intact, so byte offsets from the template parser map
/// directly into the source literal (`arg.start_byte + 1 + offset`).
pub(crate) fn literal_template(arg: &CallArg) -> Option<&str> {
    match &arg.kind {
        ArgKind::StringLit { .. } if arg.text.len() >= 2 => {
            Some(&arg.text[1..arg.text.len() - 1])
        }
        _ => None,
    }
}
