//! Centralized error type for the ottavo umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ottavo_core::Error),

    #[error("Synth: {0}")]
    Synth(#[from] ottavo_synth::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
