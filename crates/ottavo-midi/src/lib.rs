//! MIDI subsystem for the Ottavo FM synth engine.
//!
//! - [`MidiEvent`]: RT-safe channel-voice event with sample-accurate frame offset
//! - [`MidiQueue`] / [`MidiSender`]: bounded lock-free queue from the host/MIDI
//!   thread to the audio thread
//!
//! Event payloads use [`midi_msg::ChannelVoiceMsg`] so the host shell can feed
//! parsed messages straight through.

mod event;
pub use event::{MidiEvent, RawMidiEvent};

mod queue;
pub use queue::{MidiQueue, MidiSender, EVENTS_PER_BLOCK};

pub use midi_msg::{Channel, ChannelVoiceMsg, ControlChange};

/// Pitch bend center value (14-bit, no bend).
pub const PITCH_BEND_CENTER: u16 = 8192;
