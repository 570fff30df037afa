//! # Exit Codes
//!
//! Exit codes reported by the mtlog-analyzer CLI, kept stable for
//! scripts and CI pipelines.

/// No error-severity diagnostics found
pub const EXIT_SUCCESS: i32 = 0;

/// At least one error-severity diagnostic was reported
pub const EXIT_FINDINGS_FOUND: i32 = 1;

/// Invalid input (unreadable path, no Go files, bad arguments)
pub const EXIT_INVALID_INPUT: i32 = 2;
