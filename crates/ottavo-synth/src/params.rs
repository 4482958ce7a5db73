//! Lock-free parameter transport.
//!
//! Automation threads publish normalized values into fixed atomic slots;
//! the dispatcher drains dirty slots on the audio thread at a rate-limited
//! cadence. No locks, no queues, no allocation: a slot holds only the most
//! recent value, which is the right semantics for continuous parameters
//! (intermediate values are droppable).

use ottavo_core::{AtomicFlag, AtomicFloat};

use crate::routing::ParamTarget;

/// One atomic slot per [`ParamTarget`].
///
/// Shared between threads via `Arc`. `set` is wait-free; `take_dirty` is
/// wait-free and consumes the dirty flag.
#[derive(Debug)]
pub struct ParamSlots {
    values: [AtomicFloat; ParamTarget::COUNT],
    dirty: [AtomicFlag; ParamTarget::COUNT],
}

impl ParamSlots {
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| AtomicFloat::default()),
            dirty: std::array::from_fn(|_| AtomicFlag::default()),
        }
    }

    /// Publish a normalized (0.0-1.0) value for a target.
    ///
    /// Callable from any thread. The value is clamped; the slot is marked
    /// dirty after the store so the audio thread never applies a stale
    /// value for a fresh flag.
    pub fn set(&self, target: ParamTarget, normalized: f32) {
        let index = target.index();
        self.values[index].set(normalized.clamp(0.0, 1.0));
        self.dirty[index].set(true);
    }

    /// Most recently published value for a target.
    pub fn get(&self, target: ParamTarget) -> f32 {
        self.values[target.index()].get()
    }

    /// Consume the dirty flag for slot `index`, returning the value when
    /// it was set. Audio-thread side.
    pub(crate) fn take_dirty(&self, index: usize) -> Option<f32> {
        if self.dirty[index].swap(false) {
            Some(self.values[index].get())
        } else {
            None
        }
    }
}

impl Default for ParamSlots {
    fn default() -> Self {
        Self::new()
    }
}
