//! Voice and register abstraction layer for the Ottavo FM synth engine.
//!
//! Maps an unbounded stream of MIDI events and continuous parameter
//! automation onto the fixed hardware model of the emulated chip:
//!
//! - [`VoicePool`]: 8-slot allocation with stealing policies and the
//!   noise-priority path pinned to channel 7
//! - [`PanAssigner`]: per-channel stereo placement, fixed or randomized
//! - [`Patch`]: the current sound's operator/channel parameter values
//! - [`CcRouteTable`] / [`ParamTarget`]: controller-to-parameter routing
//! - [`ParamSlots`]: lock-free normalized parameter transport from
//!   automation threads
//! - [`Dispatcher`]: the per-block event router driving all of the above
//!   plus the chip's register space
//!
//! Everything here runs on the audio thread in bounded constant time: fixed
//! arrays, no locks, no steady-state allocation.

pub mod error;
pub use error::{Error, Result};

mod voice;
pub use voice::{StealPolicy, VoicePool};

mod pan;
pub use pan::{PanAssigner, PanPosition};

mod patch;
pub use patch::{NoiseConfig, OperatorPatch, PanMode, Patch};

mod routing;
pub use routing::{CcRouteTable, ParamTarget, PAN_CC_FIRST, PAN_CC_LAST};

mod params;
pub use params::ParamSlots;

mod dispatcher;
pub use dispatcher::Dispatcher;
