//! Immutable clip storage shared by the UI thread and the audio thread.
//!
//! Clips are added before the synth is started and never removed, so the
//! audio thread can read them without synchronization and never frees one.

use tachyon_shared::PcmBuffer;

/// Handle to a clip in a [`SampleBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(u32);

impl ClipId {
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleBank {
    clips: Vec<PcmBuffer>,
}

impl SampleBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a clip and returns its handle.
    pub fn add(&mut self, clip: PcmBuffer) -> ClipId {
        let id = ClipId(self.clips.len() as u32);
        self.clips.push(clip);
        id
    }

    pub fn get(&self, id: ClipId) -> Option<&PcmBuffer> {
        self.clips.get(id.index())
    }

    pub fn contains(&self, id: ClipId) -> bool {
        id.index() < self.clips.len()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
