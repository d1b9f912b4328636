//! Configuration and text utilities.

/// TOML configuration loading with environment fallback.
pub mod toml_config;
/// Token-aware prompt trimming.
pub mod trim;
