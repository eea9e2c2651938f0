//! Configuration and profile management for stackctl
//!
//! A profile pins the AWS region, the named AWS profile and an optional
//! endpoint override, plus how long to wait for stacks and how hard the SDK
//! retries.
//!
//! # Features
//!
//! - Multiple named profiles
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod retry;

// Re-export main types for convenience
pub use config::{Config, Profile, WaitSettings};
pub use error::{ConfigError, Result};
pub use retry::RetrySettings;
