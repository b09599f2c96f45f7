//! Fixed-capacity pool of playing notes.
//!
//! The pool allocates its storage once and never grows. Removal swaps the
//! last voice into the vacated slot, so voice order is not stable across
//! removals and [`VoiceId`]s are only valid until the next removal.

use crate::queue::NoteInitParameters;

/// Voice capacity used by the default synth configuration.
pub const DEFAULT_VOICE_CAPACITY: usize = 64;

/// One sounding note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayingNote {
    pub init: NoteInitParameters,
    /// Oscillator phase in cycles since the note started.
    pub phase: f64,
    /// Next frame of the attached clip to mix.
    pub source_frame_cursor: usize,
}

impl PlayingNote {
    pub fn new(init: NoteInitParameters) -> Self {
        Self {
            init,
            phase: 0.0,
            source_frame_cursor: 0,
        }
    }
}

/// Position of a voice inside a [`VoicePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceId(usize);

impl VoiceId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct VoicePool {
    voices: Vec<PlayingNote>,
    capacity: usize,
}

impl VoicePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Starts a voice. Returns `None` when the pool is full.
    pub fn spawn(&mut self, init: NoteInitParameters) -> Option<VoiceId> {
        if self.is_full() {
            return None;
        }
        self.voices.push(PlayingNote::new(init));
        Some(VoiceId(self.voices.len() - 1))
    }

    pub fn get(&self, id: VoiceId) -> Option<&PlayingNote> {
        self.voices.get(id.0)
    }

    pub fn get_mut(&mut self, id: VoiceId) -> Option<&mut PlayingNote> {
        self.voices.get_mut(id.0)
    }

    /// Removes a voice by moving the last voice into its slot.
    pub fn remove(&mut self, id: VoiceId) -> Option<PlayingNote> {
        (id.0 < self.voices.len()).then(|| self.voices.swap_remove(id.0))
    }

    /// Visits every voice once, removing those for which `keep` returns
    /// `false`. Returns how many voices were removed.
    ///
    /// A voice swapped into a vacated slot is visited in the same pass.
    pub fn retain_unordered(&mut self, mut keep: impl FnMut(&mut PlayingNote) -> bool) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.voices.len() {
            if keep(&mut self.voices[i]) {
                i += 1;
            } else {
                self.voices.swap_remove(i);
                removed += 1;
            }
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayingNote> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.voices.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(pitch_hz: f32) -> NoteInitParameters {
        NoteInitParameters::tone(pitch_hz)
    }

    #[test]
    fn test_spawn_until_full() {
        let mut pool = VoicePool::with_capacity(2);
        assert!(pool.spawn(tone(1.0)).is_some());
        assert!(pool.spawn(tone(2.0)).is_some());
        assert!(pool.is_full());
        assert!(pool.spawn(tone(3.0)).is_none());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_new_voice_starts_at_zero() {
        let mut pool = VoicePool::with_capacity(1);
        let id = pool.spawn(tone(440.0)).unwrap();
        let voice = pool.get(id).unwrap();
        assert_eq!(voice.phase, 0.0);
        assert_eq!(voice.source_frame_cursor, 0);
    }

    #[test]
    fn test_remove_swaps_last_into_slot() {
        let mut pool = VoicePool::with_capacity(4);
        let first = pool.spawn(tone(1.0)).unwrap();
        pool.spawn(tone(2.0));
        pool.spawn(tone(3.0));

        let removed = pool.remove(first).unwrap();
        assert_eq!(removed.init.pitch_hz, 1.0);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(first).unwrap().init.pitch_hz, 3.0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut pool = VoicePool::with_capacity(1);
        assert!(pool.remove(VoiceId(0)).is_none());
    }

    #[test]
    fn test_retain_visits_swapped_voice() {
        let mut pool = VoicePool::with_capacity(4);
        for pitch in [1.0, 2.0, 3.0, 4.0] {
            pool.spawn(tone(pitch));
        }

        let mut visited = Vec::new();
        let removed = pool.retain_unordered(|voice| {
            visited.push(voice.init.pitch_hz);
            voice.init.pitch_hz % 2.0 == 0.0
        });

        assert_eq!(removed, 2);
        visited.sort_by(f32::total_cmp);
        assert_eq!(visited, vec![1.0, 2.0, 3.0, 4.0]);
        let mut left: Vec<f32> = pool.iter().map(|v| v.init.pitch_hz).collect();
        left.sort_by(f32::total_cmp);
        assert_eq!(left, vec![2.0, 4.0]);
    }
}
