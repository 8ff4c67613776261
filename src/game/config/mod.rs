//! Config Module
//!
//! Centralized configuration for the editing tools.

pub mod clone_config;

pub use clone_config::{CloneToolConfig, ConfigError, PreviewColors};
