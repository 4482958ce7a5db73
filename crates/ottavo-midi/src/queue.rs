//! Bounded lock-free MIDI event queue.
//!
//! One bounded SPSC channel carries events from the host/MIDI thread to the
//! audio thread. `push` never blocks: if the queue is full the event is
//! dropped (producer back-pressure). `drain_into` fills a caller-owned,
//! pre-allocated buffer, so there is no heap traffic on the audio thread.

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use crate::MidiEvent;

/// Maximum number of MIDI events buffered per audio block.
///
/// 256 events covers extreme scenarios (full keyboard glissando plus
/// controller sweeps in a single block). Excess events are dropped.
pub const EVENTS_PER_BLOCK: usize = 256;

/// Producer handle for the host/MIDI thread.
///
/// Cheap to clone; all clones feed the same queue.
#[derive(Clone)]
pub struct MidiSender {
    tx: Sender<MidiEvent>,
}

impl MidiSender {
    /// Queue an event for the audio thread.
    ///
    /// Non-blocking. Returns `false` if the queue was full and the event
    /// was dropped.
    pub fn push(&self, event: MidiEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                trace!("MIDI queue full, dropping event");
                false
            }
        }
    }
}

/// Consumer side, owned by the audio thread.
pub struct MidiQueue {
    rx: Receiver<MidiEvent>,
}

impl MidiQueue {
    /// Create a queue with the default capacity and return both endpoints.
    pub fn new() -> (MidiSender, MidiQueue) {
        Self::with_capacity(EVENTS_PER_BLOCK)
    }

    /// Create a queue with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> (MidiSender, MidiQueue) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (MidiSender { tx }, MidiQueue { rx })
    }

    /// Drain pending events into `buf`, preserving arrival order.
    ///
    /// Returns the number of events written. Stops early when `buf` is
    /// full; remaining events stay queued for the next block. RT-safe:
    /// `try_recv` only, no allocation, no blocking.
    pub fn drain_into(&self, buf: &mut [MidiEvent]) -> usize {
        let mut count = 0;
        while count < buf.len() {
            match self.rx.try_recv() {
                Ok(event) => {
                    buf[count] = event;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        count
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> [MidiEvent; 8] {
        [MidiEvent::note_off(0, 0, 0, 0); 8]
    }

    #[test]
    fn test_push_drain_preserves_order() {
        let (tx, rx) = MidiQueue::new();
        assert!(tx.push(MidiEvent::note_on(0, 0, 60, 100)));
        assert!(tx.push(MidiEvent::note_on(0, 0, 64, 100)));
        assert!(tx.push(MidiEvent::note_off(0, 0, 60, 0)));

        let mut buf = scratch();
        let count = rx.drain_into(&mut buf);
        assert_eq!(count, 3);
        assert_eq!(buf[0].note(), Some(60));
        assert!(buf[0].is_note_on());
        assert_eq!(buf[1].note(), Some(64));
        assert!(buf[2].is_note_off());
    }

    #[test]
    fn test_overflow_drops() {
        let (tx, rx) = MidiQueue::with_capacity(2);
        assert!(tx.push(MidiEvent::note_on(0, 0, 60, 100)));
        assert!(tx.push(MidiEvent::note_on(0, 0, 61, 100)));
        // Third push is dropped, not blocked on
        assert!(!tx.push(MidiEvent::note_on(0, 0, 62, 100)));
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn test_drain_stops_at_buffer_len() {
        let (tx, rx) = MidiQueue::new();
        for note in 0..12 {
            tx.push(MidiEvent::note_on(0, 0, note, 100));
        }

        let mut buf = scratch();
        assert_eq!(rx.drain_into(&mut buf), 8);
        // Remainder stays queued for the next block
        assert_eq!(rx.len(), 4);
        assert_eq!(rx.drain_into(&mut buf), 4);
        assert!(rx.is_empty());
    }
}
