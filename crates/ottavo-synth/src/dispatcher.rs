//! MIDI event dispatch.
//!
//! The dispatcher is the only component that talks to the chip engine. It
//! routes each event to the voice pool, the pan assigner and the frequency
//! and field converters, then applies the resulting register writes. Every
//! write goes through one private path that updates the register file and
//! the chip as a single step, so the cache can never desynchronize from its
//! own history.
//!
//! Within a block: MIDI events in buffer order first, then rate-limited
//! parameter application, and only then does the caller render audio.

use std::sync::Arc;

use tracing::trace;

use ottavo_chip::{
    freq, regs, ChannelParam, ChipEngine, ChipKind, OperatorParam, RegisterFile, NUM_CHANNELS,
};
use ottavo_core::{EngineConfig, ParameterRange};
use ottavo_midi::{ChannelVoiceMsg, ControlChange, MidiEvent, PITCH_BEND_CENTER};

use crate::pan::{PanAssigner, PanPosition};
use crate::params::ParamSlots;
use crate::patch::{PanMode, Patch};
use crate::routing::{CcRouteTable, ParamTarget, PAN_CC_FIRST, PAN_CC_LAST};
use crate::voice::{StealPolicy, VoicePool};

/// Per-block MIDI event router and register writer.
pub struct Dispatcher<C: ChipEngine> {
    chip: C,
    registers: RegisterFile,
    voices: VoicePool,
    pan: PanAssigner,
    patch: Patch,
    routes: CcRouteTable,
    params: Arc<ParamSlots>,

    /// Raw 14-bit pitch bend, center 8192.
    bend_raw: u16,
    /// Current bend range in semitones.
    bend_range_semitones: f32,
    /// Legal bend range span, for the automation target.
    bend_range: ParameterRange,

    /// Automated parameters are applied every `param_interval` blocks.
    param_interval: u32,
    block_counter: u32,
}

impl<C: ChipEngine> Dispatcher<C> {
    /// Build a dispatcher around a chip engine and an initial patch.
    ///
    /// Initializes the chip and writes the full patch to the register
    /// space, so the first note-on lands on a configured chip.
    pub fn new(mut chip: C, kind: ChipKind, patch: Patch, config: &EngineConfig) -> Self {
        chip.initialize(kind, config.sample_rate);

        let bend_range = ParameterRange::integer(1, 12, 2);
        let mut dispatcher = Self {
            chip,
            registers: RegisterFile::new(),
            voices: VoicePool::new(),
            pan: PanAssigner::new(config.pan_seed),
            patch,
            routes: CcRouteTable::new(),
            params: Arc::new(ParamSlots::new()),
            bend_raw: PITCH_BEND_CENTER,
            bend_range_semitones: bend_range.clamp(config.pitch_bend_range),
            bend_range,
            param_interval: config.param_update_interval,
            block_counter: 0,
        };
        dispatcher.apply_patch();
        dispatcher
    }

    /// Process one block's MIDI events, in buffer order, then apply any
    /// pending automated parameters at the rate-limited cadence.
    ///
    /// Call once per audio block, before generating samples.
    pub fn process_block(&mut self, events: &[MidiEvent]) {
        for event in events {
            self.process_event(event);
        }

        self.block_counter = self.block_counter.wrapping_add(1);
        if self.block_counter % self.param_interval == 0 {
            self.apply_pending_params();
        }
    }

    /// Route a single MIDI event.
    pub fn process_event(&mut self, event: &MidiEvent) {
        if event.is_note_on() {
            // note/velocity always present on a note-on
            let note = event.note().unwrap_or(0);
            let velocity = event.velocity().unwrap_or(0);
            self.note_on(note, velocity);
        } else if event.is_note_off() {
            let note = event.note().unwrap_or(0);
            self.note_off(note);
        } else {
            match event.msg {
                ChannelVoiceMsg::ControlChange {
                    control: ControlChange::CC { control, value },
                } => self.control_change(control, value),
                ChannelVoiceMsg::PitchBend { bend } => self.pitch_bend(bend),
                _ => trace!(msg = ?event.msg, "unhandled MIDI message"),
            }
        }
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        let needs_noise = self.patch.noise.enabled;
        let channel = self
            .voices
            .allocate_with_noise_priority(note, velocity, needs_noise);

        // Random mode draws a fresh placement on every note-on, not once
        // per channel; fixed mode re-applies the configured position.
        let rl_bits = match self.patch.pan_mode {
            PanMode::Random => self.pan.apply_random(channel),
            PanMode::Fixed(position) => self.pan.apply_fixed(channel, position),
        };
        self.update_register(
            regs::channel_register(regs::RL_FB_CONNECT, channel),
            ChannelParam::Pan.register_mask(),
            rl_bits,
        );

        self.write_pitch(channel, note);
        self.chip.note_on(channel, note, velocity);
    }

    fn note_off(&mut self, note: u8) {
        match self.voices.channel_for_note(note) {
            Some(channel) => {
                self.chip.note_off(channel, note);
                self.voices.release(note);
            }
            // Hosts legitimately send note-off for stolen/released notes
            None => trace!(note, "note off without a matching voice"),
        }
    }

    fn control_change(&mut self, cc: u8, value: u8) {
        // The pan block addresses the per-channel array directly
        if (PAN_CC_FIRST..=PAN_CC_LAST).contains(&cc) {
            let channel = cc - PAN_CC_FIRST;
            let position = PanPosition::from_normalized(value as f32 / 127.0);
            let rl_bits = self.pan.apply_fixed(channel, position);
            self.update_register(
                regs::channel_register(regs::RL_FB_CONNECT, channel),
                ChannelParam::Pan.register_mask(),
                rl_bits,
            );
            return;
        }

        match self.routes.lookup(cc) {
            Some(target) => self.apply_target(target, value as f32 / 127.0),
            None => trace!(cc, "unmapped controller ignored"),
        }
    }

    fn pitch_bend(&mut self, bend: u16) {
        self.bend_raw = bend;
        // Bend is live: re-pitch every sounding voice, not just new notes
        for channel in 0..NUM_CHANNELS as u8 {
            if self.voices.is_active(channel) {
                let note = self.voices.note_for(channel);
                self.write_pitch(channel, note);
            }
        }
    }

    /// Current bend offset in semitones.
    pub fn pitch_bend_semitones(&self) -> f32 {
        (self.bend_raw as f32 - PITCH_BEND_CENTER as f32) / PITCH_BEND_CENTER as f32
            * self.bend_range_semitones
    }

    /// Set the bend range, clamped to 1-12 semitones.
    pub fn set_pitch_bend_range(&mut self, semitones: f32) {
        self.bend_range_semitones = self.bend_range.clamp(semitones);
    }

    fn write_pitch(&mut self, channel: u8, note: u8) {
        let code = freq::note_to_frequency_code_with_bend(note, self.pitch_bend_semitones());
        self.write_register(regs::channel_register(regs::KEY_CODE, channel), code.key_code);
        self.write_register(
            regs::channel_register(regs::KEY_FRACTION, channel),
            code.key_fraction,
        );
    }

    /// Apply one normalized parameter change to the register space.
    fn apply_target(&mut self, target: ParamTarget, normalized: f32) {
        match target {
            ParamTarget::Operator(op, kind) => {
                let raw = (normalized * kind.max_value() as f32).round() as u8;
                let encoded = kind.encode(raw);
                for channel in 0..NUM_CHANNELS as u8 {
                    self.update_register(
                        regs::operator_register(kind.register_base(), channel, op as usize),
                        kind.register_mask(),
                        encoded << kind.shift(),
                    );
                }
            }
            ParamTarget::Channel(ChannelParam::Pan) => {
                // Keep the assigner's memory in sync with automated pan
                let position = PanPosition::from_normalized(normalized);
                let rl_bits = self.pan.apply_to_all(position);
                for channel in 0..NUM_CHANNELS as u8 {
                    self.update_register(
                        regs::channel_register(regs::RL_FB_CONNECT, channel),
                        ChannelParam::Pan.register_mask(),
                        rl_bits,
                    );
                }
            }
            ParamTarget::Channel(kind) => {
                let raw = (normalized * kind.max_value() as f32).round() as u8;
                let encoded = kind.encode(raw);
                for channel in 0..NUM_CHANNELS as u8 {
                    self.update_register(
                        regs::channel_register(kind.register_base(), channel),
                        kind.register_mask(),
                        encoded << kind.shift(),
                    );
                }
            }
            ParamTarget::NoiseFrequency => {
                let raw = (normalized * 31.0).round() as u8;
                // Preserve the enable bit owned by the patch
                self.update_register(regs::NOISE, 0x1F, raw & 0x1F);
            }
            ParamTarget::PitchBendRange => {
                self.bend_range_semitones = self.bend_range.denormalize(normalized);
            }
        }
    }

    /// Drain dirty automation slots. Bounded: one pass over a fixed array.
    fn apply_pending_params(&mut self) {
        for index in 0..ParamTarget::COUNT {
            if let Some(value) = self.params.take_dirty(index) {
                if let Some(target) = ParamTarget::from_index(index) {
                    self.apply_target(target, value);
                }
            }
        }
    }

    /// Write the complete current patch to the register space.
    ///
    /// Used at startup, on patch change and on reset. All 8 channels carry
    /// the same tone; only pan differs per channel.
    pub fn apply_patch(&mut self) {
        let ops = self.patch.ops;
        for (op, op_patch) in ops.iter().enumerate() {
            for kind in OperatorParam::ALL {
                let encoded = kind.encode(op_patch.value(kind));
                for channel in 0..NUM_CHANNELS as u8 {
                    self.update_register(
                        regs::operator_register(kind.register_base(), channel, op),
                        kind.register_mask(),
                        encoded << kind.shift(),
                    );
                }
            }
        }

        for kind in [
            ChannelParam::Algorithm,
            ChannelParam::Feedback,
            ChannelParam::Ams,
            ChannelParam::Pms,
        ] {
            let encoded = kind.encode(self.patch.channel_value(kind));
            for channel in 0..NUM_CHANNELS as u8 {
                self.update_register(
                    regs::channel_register(kind.register_base(), channel),
                    kind.register_mask(),
                    encoded << kind.shift(),
                );
            }
        }

        // Pan: fixed mode pushes the configured position everywhere;
        // random mode starts from center and diverges per note-on.
        let rl_bits = match self.patch.pan_mode {
            PanMode::Fixed(position) => self.pan.apply_to_all(position),
            PanMode::Random => self.pan.apply_to_all(PanPosition::Center),
        };
        for channel in 0..NUM_CHANNELS as u8 {
            self.update_register(
                regs::channel_register(regs::RL_FB_CONNECT, channel),
                ChannelParam::Pan.register_mask(),
                rl_bits,
            );
        }

        let noise = ((self.patch.noise.enabled as u8) << 7) | (self.patch.noise.frequency & 0x1F);
        self.write_register(regs::NOISE, noise);
    }

    /// Swap in a new patch and write it through.
    pub fn set_patch(&mut self, patch: Patch) {
        self.patch = patch;
        self.apply_patch();
    }

    #[inline]
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Select the voice stealing policy.
    pub fn set_stealing_policy(&mut self, policy: StealPolicy) {
        self.voices.set_policy(policy);
    }

    /// Key off every sounding voice. Used on transport stop.
    pub fn all_notes_off(&mut self) {
        for channel in 0..NUM_CHANNELS as u8 {
            if self.voices.is_active(channel) {
                self.chip.note_off(channel, self.voices.note_for(channel));
            }
        }
        self.voices.release_all();
    }

    /// Return everything to power-on state: voices, pan, registers, bend,
    /// and the chip itself, then re-apply the current patch.
    pub fn reset(&mut self) {
        self.voices.reset();
        self.pan.reset_random_state();
        self.registers.reset();
        self.chip.reset();
        self.bend_raw = PITCH_BEND_CENTER;
        self.block_counter = 0;
        self.apply_patch();
    }

    /// Lock-free automation slots, for sharing with automation threads.
    pub fn params(&self) -> Arc<ParamSlots> {
        Arc::clone(&self.params)
    }

    #[inline]
    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    #[inline]
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    #[inline]
    pub fn pan(&self) -> &PanAssigner {
        &self.pan
    }

    #[inline]
    pub fn chip(&self) -> &C {
        &self.chip
    }

    #[inline]
    pub fn chip_mut(&mut self) -> &mut C {
        &mut self.chip
    }

    /// Write one register: the cache and the chip move together, always.
    fn write_register(&mut self, address: u8, value: u8) {
        self.registers.write(address, value);
        self.chip.write_register(address, value);
    }

    /// Read-modify-write of a field inside a shared register, using the
    /// cache as the source of current state.
    fn update_register(&mut self, address: u8, mask: u8, value: u8) {
        let merged = (self.registers.read(address) & !mask) | (value & mask);
        self.write_register(address, merged);
    }
}
