//! # burnlink-core
//!
//! Core configuration and utilities for Burnlink.
//!
//! This crate provides shared functionality used across all Burnlink crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the JSON5 config file
//! - **Secure buffers**: [`SecretBytes`], a zero-on-drop byte buffer that never prints
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use secret::SecretBytes;
