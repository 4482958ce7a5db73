//! # Ottavo - 8-voice FM synthesizer engine
//!
//! Software emulation front end for an OPM-class FM sound chip: 8 channels,
//! 4 operators each, a 256-byte register space and a noise generator wired
//! to channel 7. Ottavo owns everything between MIDI input and the chip's
//! register interface: voice allocation and stealing, pitch conversion,
//! parameter field encoding, pan assignment and the per-block dispatch.
//! The tone generator itself stays behind the
//! [`ChipEngine`](ottavo_chip::ChipEngine) trait.
//!
//! ## Architecture
//!
//! - **ottavo-core** - lock-free atomics, parameter ranges, configuration
//! - **ottavo-midi** - RT-safe MIDI events and the bounded input queue
//! - **ottavo-chip** - the hardware model: register map, register file,
//!   frequency codes, parameter fields, the `ChipEngine` seam
//! - **ottavo-synth** - voice pool, pan assigner, patch, CC routing and the
//!   MIDI dispatcher
//!
//! ## Quick Start
//!
//! ```
//! use ottavo::prelude::*;
//!
//! let mut engine = OttavoEngineBuilder::new()
//!     .sample_rate(48_000.0)
//!     .build(NullChip)
//!     .unwrap();
//!
//! let midi = engine.midi_sender();
//! midi.push(MidiEvent::note_on(0, 0, 60, 100));
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! engine.process_block(&mut left, &mut right);
//! ```

/// Re-export of ottavo-core for direct access
pub use ottavo_core as core;

/// Re-export of ottavo-midi for direct access
pub use ottavo_midi as midi;

/// Re-export of ottavo-chip for direct access
pub use ottavo_chip as chip;

/// Re-export of ottavo-synth for direct access
pub use ottavo_synth as synth;

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::OttavoEngineBuilder;

mod engine;
pub use engine::OttavoEngine;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::{Error, OttavoEngine, OttavoEngineBuilder, Result};

    pub use ottavo_chip::{ChipEngine, ChipKind, NullChip};
    pub use ottavo_core::EngineConfig;
    pub use ottavo_midi::{MidiEvent, MidiSender};
    pub use ottavo_synth::{
        PanMode, PanPosition, ParamTarget, Patch, StealPolicy,
    };
}
