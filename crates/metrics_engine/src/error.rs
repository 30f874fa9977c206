//! Error types for engine configuration
//!
//! Search itself never fails on a parsed position; everything here comes
//! from loading settings and choosing profiles.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or configuring an engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Config file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `EngineConfig`
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A profile weight is negative or not finite
    #[error("Profile '{profile}': weight '{weight}' must be finite and non-negative, got {value}")]
    InvalidWeight {
        profile: String,
        weight: &'static str,
        value: f64,
    },

    /// Neither the config nor the built-ins define this profile
    #[error("Unknown evaluation profile '{0}'")]
    UnknownProfile(String),
}

/// Result type alias for engine configuration
pub type EngineResult<T> = Result<T, EngineError>;
