//! Lock-free note queue between the UI thread and the audio thread.
//!
//! A single-producer single-consumer ring of [`NoteInitParameters`]. The
//! producer half lives on the thread that triggers notes, the consumer half
//! inside the audio callback. Each side only advances its own index; the
//! ring publishes writes with release ordering and observes them with
//! acquire ordering, so no lock is ever taken.
//!
//! A full ring rejects the push instead of blocking or growing: losing a
//! note is preferable to stalling the UI thread.

use ringbuf::{
    HeapCons, HeapProd, HeapRb,
    traits::{Consumer, Observer, Producer, Split},
};

use crate::SynthError;
use crate::bank::ClipId;

/// Queue capacity used by the default synth configuration.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Parameters of a note trigger, copied through the queue by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteInitParameters {
    /// Oscillator pitch. Zero disables the oscillator for sample-only notes.
    pub pitch_hz: f32,
    /// Clip mixed in alongside the oscillator.
    pub source: Option<ClipId>,
}

impl NoteInitParameters {
    /// Oscillator-only note.
    pub fn tone(pitch_hz: f32) -> Self {
        Self {
            pitch_hz,
            source: None,
        }
    }

    /// Sample-only note.
    pub fn sample(clip: ClipId) -> Self {
        Self {
            pitch_hz: 0.0,
            source: Some(clip),
        }
    }

    pub fn with_source(mut self, clip: ClipId) -> Self {
        self.source = Some(clip);
        self
    }
}

/// Creates a connected producer/consumer pair.
///
/// `capacity` must be a non-zero power of two.
pub fn note_queue(capacity: usize) -> Result<(NoteProducer, NoteConsumer), SynthError> {
    if !capacity.is_power_of_two() {
        return Err(SynthError::InvalidQueueCapacity(capacity));
    }
    let (producer, consumer) = HeapRb::<NoteInitParameters>::new(capacity).split();
    Ok((
        NoteProducer {
            inner: producer,
            capacity,
            written: 0,
            rejected: 0,
        },
        NoteConsumer {
            inner: consumer,
            capacity,
            consumed: 0,
        },
    ))
}

/// Writing half of the note queue. Owned by exactly one thread.
pub struct NoteProducer {
    inner: HeapProd<NoteInitParameters>,
    capacity: usize,
    written: u64,
    rejected: u64,
}

impl NoteProducer {
    /// Enqueues a note. Returns `false` and leaves the queue untouched when
    /// it already holds `capacity` unread notes.
    pub fn push(&mut self, note: NoteInitParameters) -> bool {
        match self.inner.try_push(note) {
            Ok(()) => {
                self.written += 1;
                true
            }
            Err(_) => {
                self.rejected += 1;
                false
            }
        }
    }

    /// Notes currently waiting for the consumer.
    pub fn len(&self) -> usize {
        self.inner.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total notes accepted since creation.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Total notes rejected because the queue was full.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

/// Reading half of the note queue. Owned by the audio callback.
pub struct NoteConsumer {
    inner: HeapCons<NoteInitParameters>,
    capacity: usize,
    consumed: u64,
}

impl NoteConsumer {
    /// Dequeues the oldest note, if any.
    pub fn pop(&mut self) -> Option<NoteInitParameters> {
        let note = self.inner.try_pop()?;
        self.consumed += 1;
        Some(note)
    }

    pub fn len(&self) -> usize {
        self.inner.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total notes dequeued since creation.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}
