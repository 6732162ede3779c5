//! Core building blocks shared by every command
//!
//! - **config**: crd-graph.toml parsing and validation
//! - **context**: Store and config loaded once, passed to commands
//! - **error**: Error types with exit codes and help messages

pub mod config;
pub mod context;
pub mod error;
