//! The engine facade: MIDI queue in, audio out.

use std::sync::Arc;

use ottavo_chip::ChipEngine;
use ottavo_midi::{MidiEvent, MidiQueue, MidiSender, EVENTS_PER_BLOCK};
use ottavo_synth::{Dispatcher, ParamSlots, Patch, StealPolicy};

/// Complete synthesizer engine around a chip implementation.
///
/// `process_block` is the audio-thread entry point: it drains the MIDI
/// queue into a pre-allocated buffer, dispatches every event in arrival
/// order, applies rate-limited parameter automation, and then renders one
/// block through the chip. Nothing on this path allocates or blocks.
pub struct OttavoEngine<C: ChipEngine> {
    dispatcher: Dispatcher<C>,
    midi_tx: MidiSender,
    midi_rx: MidiQueue,
    /// Pre-allocated scratch for draining the queue.
    event_buf: Vec<MidiEvent>,
    /// Largest block the host promised to request.
    max_block_size: usize,
}

impl<C: ChipEngine> OttavoEngine<C> {
    pub(crate) fn from_parts(dispatcher: Dispatcher<C>, max_block_size: usize) -> Self {
        let (midi_tx, midi_rx) = MidiQueue::new();
        Self {
            dispatcher,
            midi_tx,
            midi_rx,
            event_buf: vec![MidiEvent::note_off(0, 0, 0, 0); EVENTS_PER_BLOCK],
            max_block_size,
        }
    }

    /// Render one block of stereo audio.
    ///
    /// `left` and `right` must be the same length. All MIDI queued since
    /// the previous block is processed first, in order; parameter
    /// automation lands after the events and before sample generation.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert!(left.len() <= self.max_block_size, "block exceeds negotiated size");

        let count = self.midi_rx.drain_into(&mut self.event_buf);
        self.dispatcher.process_block(&self.event_buf[..count]);
        self.dispatcher.chip_mut().generate_samples(left, right);
    }

    /// Handle for feeding MIDI from the host/input thread. Cheap to clone.
    pub fn midi_sender(&self) -> MidiSender {
        self.midi_tx.clone()
    }

    /// Lock-free automation slots, shareable with any thread.
    pub fn params(&self) -> Arc<ParamSlots> {
        self.dispatcher.params()
    }

    /// Process a single event immediately, bypassing the queue.
    ///
    /// For hosts that deliver events synchronously on the audio thread.
    pub fn process_event(&mut self, event: &MidiEvent) {
        self.dispatcher.process_event(event);
    }

    /// Swap the current patch.
    pub fn set_patch(&mut self, patch: Patch) {
        self.dispatcher.set_patch(patch);
    }

    /// Select the voice stealing policy.
    pub fn set_stealing_policy(&mut self, policy: StealPolicy) {
        self.dispatcher.set_stealing_policy(policy);
    }

    /// Key off everything. Used on transport stop.
    pub fn all_notes_off(&mut self) {
        self.dispatcher.all_notes_off();
    }

    /// Return the whole engine to power-on state.
    pub fn reset(&mut self) {
        self.dispatcher.reset();
    }

    /// The dispatch layer, for inspection and advanced control.
    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }

    #[inline]
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<C> {
        &mut self.dispatcher
    }
}
