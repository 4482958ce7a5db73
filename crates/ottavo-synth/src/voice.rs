//! Voice pool for the fixed 8-channel hardware model.
//!
//! Exactly 8 voices exist for the lifetime of the engine, one per hardware
//! channel. Voices are never created or destroyed, only activated and reset;
//! every operation below is a bounded scan over at most 8 slots.
//!
//! Channel 7 is the only channel wired to the noise generator, so the free
//! search runs 7 down to 0: ordinary notes fill 7 first and churn through it
//! quickly, which keeps it available more often than not, but nothing
//! reserves it. When a sound actually needs noise, allocation is pinned to
//! channel 7 and steals it unconditionally.

use tracing::debug;

use ottavo_chip::{NOISE_CHANNEL, NUM_CHANNELS};

/// Which voice to steal when all 8 channels are sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealPolicy {
    /// Steal the voice with the smallest timestamp (most common).
    #[default]
    Oldest,
    /// Steal the voice with the smallest velocity.
    Quietest,
    /// Steal the voice with the lowest note number.
    Lowest,
}

/// One hardware channel's note assignment.
#[derive(Debug, Clone, Copy, Default)]
struct Voice {
    active: bool,
    note: u8,
    velocity: u8,
    timestamp: u64,
}

/// Fixed 8-slot voice allocator.
///
/// RT-safe: no allocation, every operation completes in bounded time.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: [Voice; NUM_CHANNELS],
    /// Monotonic allocation counter; relative order only, treated as
    /// practically unbounded (never compared across wraparound).
    clock: u64,
    policy: StealPolicy,
}

impl VoicePool {
    pub fn new() -> Self {
        Self {
            voices: [Voice::default(); NUM_CHANNELS],
            clock: 0,
            policy: StealPolicy::Oldest,
        }
    }

    /// Set the stealing policy used when no channel is free.
    pub fn set_policy(&mut self, policy: StealPolicy) {
        self.policy = policy;
    }

    #[inline]
    pub fn policy(&self) -> StealPolicy {
        self.policy
    }

    /// Allocate a channel for `note`.
    ///
    /// If the note is already sounding somewhere, that channel is
    /// retriggered (velocity and timestamp refreshed); a note never
    /// occupies two channels. Otherwise the first free channel searching
    /// 7 down to 0 is used, and when none is free one is stolen per the
    /// active [`StealPolicy`].
    pub fn allocate(&mut self, note: u8, velocity: u8) -> u8 {
        self.allocate_with_noise_priority(note, velocity, false)
    }

    /// Allocate a channel for `note`, restricting to the noise channel
    /// when `needs_noise` is set.
    ///
    /// Noise voices live on channel 7 exclusively: free or not, that is
    /// the channel they get. No eviction happens in the other direction:
    /// a non-noise voice sitting on channel 7 is simply overwritten, and a
    /// later non-noise steal may equally well take channel 7 back from a
    /// noise voice.
    pub fn allocate_with_noise_priority(&mut self, note: u8, velocity: u8, needs_noise: bool) -> u8 {
        debug_assert!(note <= 127, "MIDI note out of range: {note}");
        debug_assert!(velocity <= 127, "MIDI velocity out of range: {velocity}");

        // Retrigger first, in both modes: the note keeps its channel.
        if let Some(channel) = self.channel_for_note(note) {
            self.clock += 1;
            let voice = &mut self.voices[channel as usize];
            voice.velocity = velocity;
            voice.timestamp = self.clock;
            return channel;
        }

        let channel = if needs_noise {
            if self.voices[NOISE_CHANNEL as usize].active {
                debug!(
                    stolen_note = self.voices[NOISE_CHANNEL as usize].note,
                    "noise allocation stealing channel 7"
                );
            }
            NOISE_CHANNEL
        } else if let Some(free) = self.find_free() {
            free
        } else {
            let target = self.steal_target();
            debug!(
                channel = target,
                stolen_note = self.voices[target as usize].note,
                policy = ?self.policy,
                "voice stolen"
            );
            target
        };

        self.clock += 1;
        self.voices[channel as usize] = Voice {
            active: true,
            note,
            velocity,
            timestamp: self.clock,
        };
        channel
    }

    /// Deactivate the voice holding `note`. No-op if the note is not
    /// sounding (already released or stolen).
    pub fn release(&mut self, note: u8) {
        if let Some(channel) = self.channel_for_note(note) {
            self.voices[channel as usize].active = false;
        }
    }

    /// Deactivate every voice. Used on transport stop.
    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.active = false;
        }
    }

    /// Deactivate everything, rewind the timestamp counter and restore the
    /// default stealing policy.
    pub fn reset(&mut self) {
        self.voices = [Voice::default(); NUM_CHANNELS];
        self.clock = 0;
        self.policy = StealPolicy::Oldest;
    }

    #[inline]
    pub fn is_active(&self, channel: u8) -> bool {
        self.voices[channel as usize].active
    }

    /// Note held by `channel` (last held note if the channel is inactive).
    #[inline]
    pub fn note_for(&self, channel: u8) -> u8 {
        self.voices[channel as usize].note
    }

    /// Velocity of the voice on `channel`.
    #[inline]
    pub fn velocity_for(&self, channel: u8) -> u8 {
        self.voices[channel as usize].velocity
    }

    /// Channel currently sounding `note`, if any. At most one exists.
    pub fn channel_for_note(&self, note: u8) -> Option<u8> {
        (0..NUM_CHANNELS as u8).find(|&ch| {
            let voice = &self.voices[ch as usize];
            voice.active && voice.note == note
        })
    }

    /// Number of currently sounding voices.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }

    /// First free channel, searching 7 down to 0.
    fn find_free(&self) -> Option<u8> {
        (0..NUM_CHANNELS as u8)
            .rev()
            .find(|&ch| !self.voices[ch as usize].active)
    }

    /// Channel to steal under the active policy. Only called with all 8
    /// channels active; ties break toward the lowest channel index.
    fn steal_target(&self) -> u8 {
        let mut best = 0usize;
        for ch in 1..NUM_CHANNELS {
            let better = match self.policy {
                StealPolicy::Oldest => {
                    self.voices[ch].timestamp < self.voices[best].timestamp
                }
                StealPolicy::Quietest => self.voices[ch].velocity < self.voices[best].velocity,
                StealPolicy::Lowest => self.voices[ch].note < self.voices[best].note,
            };
            if better {
                best = ch;
            }
        }
        best as u8
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_from_channel_seven_down() {
        let mut pool = VoicePool::new();
        for (i, note) in (60..68).enumerate() {
            let ch = pool.allocate(note, 100);
            assert_eq!(ch, 7 - i as u8);
        }
        assert_eq!(pool.active_count(), 8);
    }

    #[test]
    fn test_retrigger_keeps_channel() {
        let mut pool = VoicePool::new();
        let ch = pool.allocate(60, 100);
        assert_eq!(pool.allocate(60, 40), ch);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.velocity_for(ch), 40);
    }

    #[test]
    fn test_release_frees_channel_for_reuse() {
        let mut pool = VoicePool::new();
        pool.allocate(60, 100); // ch 7
        pool.allocate(64, 100); // ch 6
        pool.release(60);
        assert!(!pool.is_active(7));
        // Freed channel 7 is preferred again
        assert_eq!(pool.allocate(67, 100), 7);
    }

    #[test]
    fn test_release_unknown_note_is_noop() {
        let mut pool = VoicePool::new();
        pool.allocate(60, 100);
        pool.release(99);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_steal_oldest() {
        let mut pool = VoicePool::new();
        for note in 60..68 {
            pool.allocate(note, 100);
        }
        // Note 60 went to channel 7 first, so it is the oldest
        let ch = pool.allocate(80, 100);
        assert_eq!(ch, 7);
        assert_eq!(pool.note_for(7), 80);
        assert_eq!(pool.active_count(), 8);
        assert_eq!(pool.channel_for_note(60), None);
    }

    #[test]
    fn test_steal_quietest() {
        let mut pool = VoicePool::new();
        pool.set_policy(StealPolicy::Quietest);
        for (i, note) in (60..68).enumerate() {
            pool.allocate(note, 100 - i as u8); // ch 0 (note 67) is quietest
        }
        let ch = pool.allocate(80, 127);
        assert_eq!(ch, 0);
        assert_eq!(pool.channel_for_note(67), None);
    }

    #[test]
    fn test_steal_lowest_note() {
        let mut pool = VoicePool::new();
        pool.set_policy(StealPolicy::Lowest);
        for note in 60..68 {
            pool.allocate(note, 100);
        }
        let ch = pool.allocate(80, 100);
        // Note 60 is the lowest, sitting on channel 7
        assert_eq!(ch, 7);
        assert_eq!(pool.channel_for_note(60), None);
    }

    #[test]
    fn test_steal_tie_breaks_to_lowest_channel() {
        let mut pool = VoicePool::new();
        pool.set_policy(StealPolicy::Quietest);
        for note in 60..68 {
            pool.allocate(note, 100); // all equal velocity
        }
        assert_eq!(pool.allocate(80, 100), 0);
    }

    #[test]
    fn test_exactly_one_voice_stolen() {
        let mut pool = VoicePool::new();
        for note in 60..68 {
            pool.allocate(note, 100);
        }
        let before: Vec<u8> = (0..8).map(|ch| pool.note_for(ch)).collect();
        pool.allocate(90, 100);
        let after: Vec<u8> = (0..8).map(|ch| pool.note_for(ch)).collect();
        let changed = before
            .iter()
            .zip(&after)
            .filter(|(b, a)| b != a)
            .count();
        assert_eq!(changed, 1);
        assert_eq!(pool.active_count(), 8);
    }

    #[test]
    fn test_noise_priority_always_channel_seven() {
        let mut pool = VoicePool::new();
        for note in 60..68 {
            pool.allocate(note, 100);
        }
        assert_eq!(pool.allocate_with_noise_priority(90, 100, true), 7);
        assert_eq!(pool.allocate_with_noise_priority(91, 100, true), 7);
        assert_eq!(pool.note_for(7), 91);
    }

    #[test]
    fn test_noise_priority_on_empty_pool() {
        let mut pool = VoicePool::new();
        assert_eq!(pool.allocate_with_noise_priority(60, 100, true), 7);
    }

    #[test]
    fn test_noise_priority_retrigger_wins() {
        let mut pool = VoicePool::new();
        let ch = pool.allocate(60, 100); // ch 7
        pool.allocate(64, 100); // ch 6
        // Note 64 already sounds on channel 6; noise flag does not move it
        assert_eq!(pool.allocate_with_noise_priority(64, 90, true), 6);
        assert_eq!(pool.note_for(ch), 60);
    }

    #[test]
    fn test_non_noise_allocation_may_still_take_channel_seven() {
        // The pool does not fence channel 7 off for noise voices
        let mut pool = VoicePool::new();
        pool.allocate_with_noise_priority(60, 100, true); // noise voice on 7
        pool.release(60);
        assert_eq!(pool.allocate(64, 100), 7);
    }

    #[test]
    fn test_release_all() {
        let mut pool = VoicePool::new();
        pool.allocate(60, 100);
        pool.allocate(64, 100);
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut pool = VoicePool::new();
        pool.set_policy(StealPolicy::Lowest);
        pool.allocate(60, 100);
        pool.reset();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.policy(), StealPolicy::Oldest);
        // Counter rewound: the next allocation starts the ordering over
        assert_eq!(pool.allocate(62, 100), 7);
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let mut pool = VoicePool::new();
        pool.allocate(60, 100);
        pool.allocate(61, 100);
        pool.allocate(60, 100); // retrigger also ticks the clock
        pool.set_policy(StealPolicy::Oldest);
        for note in 62..68 {
            pool.allocate(note, 100);
        }
        // After the retrigger, note 61 (channel 6) is the oldest
        assert_eq!(pool.allocate(90, 100), 6);
    }
}
