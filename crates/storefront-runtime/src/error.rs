//! # Runtime Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Runtime Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Telemetry    │  │        Domain           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Telemetry      │  │  Core(CoreError)        │ │
//! │  │  Io / TOML      │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Everything the runtime layer can fail with.
#[derive(Debug, Error)]
pub enum RuntimeError {
    // =========================================================================
    // Domain
    // =========================================================================
    /// A cart, coupon or checkout rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are inconsistent.
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Reading or writing the config file failed.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for `StoreConfig`.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Telemetry
    // =========================================================================
    /// The global tracing subscriber could not be installed.
    #[error("Failed to initialise tracing: {0}")]
    Telemetry(String),
}

impl RuntimeError {
    /// The domain error behind this failure, if any.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            RuntimeError::Core(err) => Some(err),
            _ => None,
        }
    }
}
