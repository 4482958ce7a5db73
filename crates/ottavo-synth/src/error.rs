//! Error types for ottavo-synth.

use thiserror::Error;

/// Result type alias for ottavo-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ottavo-synth.
///
/// These only surface from construction and configuration paths; the audio
/// thread operations are total and never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A controller route targets something that does not exist.
    #[error("Invalid CC route: {0}")]
    InvalidRoute(String),

    /// Core error.
    #[error(transparent)]
    Core(#[from] ottavo_core::Error),
}
