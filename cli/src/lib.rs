//! # mtlog-analyzer CLI Library
//!
//! Command implementations for the mtlog-analyzer binary, which runs the
//! [`mtlog_analysis`] checks over Go files and renders the diagnostics.
//!
//! ## Modules
//!
//! - [`commands`] - CLI command implementations
//! - [`exit_codes`] - Standard exit codes
//! - [`output`] - Text, JSON, and fix-preview rendering
//! - [`workspace`] - Go file collection

pub mod commands;
pub mod exit_codes;
pub mod output;
pub mod workspace;
