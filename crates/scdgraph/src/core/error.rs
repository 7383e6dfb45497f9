//! Core error types for graph processing
//!
//! This module defines the error type shared by every stage of the
//! parse → layout → render → export pipeline.

use thiserror::Error;

/// Core error types for graph processing
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid entry '{token}'. Use numbers or 'x'/'-'/'na' for missing.")]
    InvalidSeriesToken { token: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid color '{color}': expected #rgb or #rrggbb")]
    InvalidColor { color: String },

    #[error("Document error: {source}")]
    Document {
        #[from]
        source: serde_json::Error,
    },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Create a new series token error
    pub fn invalid_token(token: impl Into<String>) -> Self {
        Self::InvalidSeriesToken {
            token: token.into(),
        }
    }

    /// Create a new configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new color error
    pub fn invalid_color(color: impl Into<String>) -> Self {
        Self::InvalidColor {
            color: color.into(),
        }
    }

    /// Create a new export error
    pub fn export_error(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, GraphError>;
