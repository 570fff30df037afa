//! # CLI Command Implementations
//!
//! - [`check`] - Analyze Go files for mtlog mistakes

pub mod check;
