//! Core primitives shared by the Ottavo synthesizer crates.
//!
//! - [`AtomicFloat`] / [`AtomicFlag`]: cache-line-aligned lock-free cells for
//!   cross-thread parameter automation
//! - [`ParameterRange`]: normalized (0.0-1.0) ↔ real value conversion
//! - [`EngineConfig`]: validated engine configuration
//!
//! Everything in this crate is allocation-free after construction and safe to
//! touch from the audio thread.

pub mod error;
pub use error::{Error, Result};

mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

mod config;
pub use config::EngineConfig;
