//! The synth engine.
//!
//! [`synth`] builds a connected pair: a [`SynthHandle`] for the thread that
//! triggers notes and a [`SynthEngine`] that is registered once as the
//! device's [`AudioCallback`]. They share only the note queue, the
//! immutable [`SampleBank`] and relaxed diagnostic counters.
//!
//! Each quantum the engine:
//! 1. zeroes the output buffer,
//! 2. moves queued notes into free voices, leaving the rest queued when
//!    every voice is busy,
//! 3. renders each voice's decaying sine additively and mixes its clip,
//! 4. retires voices whose envelope fell below the release threshold.
//!
//! Rendering never allocates, locks or logs.

use std::f64::consts::TAU;
use std::sync::Arc;

use tachyon_shared::{AudioBuffer, AudioCallback};
use tracing::{debug, info, warn};

use crate::SynthError;
use crate::bank::{ClipId, SampleBank};
use crate::metrics::{SynthMetrics, SynthStats};
use crate::mixing::{db_to_amp, mix, saturating_add_sample};
use crate::queue::{
    DEFAULT_QUEUE_CAPACITY, NoteConsumer, NoteInitParameters, NoteProducer, note_queue,
};
use crate::voice::{DEFAULT_VOICE_CAPACITY, PlayingNote, VoicePool};


/// Envelope decay per oscillator cycle.
const ENVELOPE_DECAY_PER_CYCLE: f64 = 6.0 * 0.001;
/// A voice whose envelope ends a quantum below this level is retired.
pub const RELEASE_THRESHOLD: f64 = 0.01;
/// Scale from unit amplitude to 16-bit samples.
const FULL_SCALE: f32 = 32767.0;

/// Default voice level.
pub const DEFAULT_VOLUME_DB: f32 = -20.0;

/// Envelope level at `phase` cycles into a note.
pub fn envelope(phase: f64) -> f64 {
    (-ENVELOPE_DECAY_PER_CYCLE * phase).exp().min(1.0)
}

/// Sizing and level of a synth instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Note queue slots. Must be a power of two.
    pub queue_capacity: usize,
    /// Maximum simultaneous voices.
    pub voice_capacity: usize,
    /// Per-voice level applied to the oscillator and the mixed clip.
    pub volume_db: f32,
}

impl SynthConfig {
    /// Smaller queue and pool for constrained targets.
    pub fn minimal() -> Self {
        Self {
            queue_capacity: 4,
            voice_capacity: 32,
            volume_db: DEFAULT_VOLUME_DB,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            voice_capacity: DEFAULT_VOICE_CAPACITY,
            volume_db: DEFAULT_VOLUME_DB,
        }
    }
}

/// Builds a handle/engine pair sharing `bank`.
pub fn synth(
    config: &SynthConfig,
    bank: SampleBank,
) -> Result<(SynthHandle, SynthEngine), SynthError> {
    if config.voice_capacity == 0 {
        return Err(SynthError::ZeroVoices);
    }
    let (producer, consumer) = note_queue(config.queue_capacity)?;
    let bank = Arc::new(bank);
    let metrics = Arc::new(SynthMetrics::default());

    info!(
        "Synth created: {} queue slots, {} voices, {} clips, {:.1} dB",
        config.queue_capacity,
        config.voice_capacity,
        bank.len(),
        config.volume_db
    );

    let handle = SynthHandle {
        notes: producer,
        bank: Arc::clone(&bank),
        metrics: Arc::clone(&metrics),
    };
    let engine = SynthEngine {
        notes: consumer,
        voices: VoicePool::with_capacity(config.voice_capacity),
        bank,
        amp: db_to_amp(config.volume_db),
        metrics,
    };
    Ok((handle, engine))
}

/// Note-triggering side of the synth. Never blocks.
pub struct SynthHandle {
    notes: NoteProducer,
    bank: Arc<SampleBank>,
    metrics: Arc<SynthMetrics>,
}

impl SynthHandle {
    /// Queues a note. Returns `false` if the queue is full or the note is invalid.
    pub fn push(&mut self, note: NoteInitParameters) -> bool {
        if !note.pitch_hz.is_finite() || note.pitch_hz < 0.0 {
            warn!("Rejecting note with invalid pitch {}", note.pitch_hz);
            return false;
        }
        if let Some(clip) = note.source
            && !self.bank.contains(clip)
        {
            warn!("Rejecting note with unknown clip {:?}", clip);
            return false;
        }
        if !self.notes.push(note) {
            self.metrics.record_dropped();
            debug!(
                "Note queue full ({} slots), dropping note at {} Hz",
                self.notes.capacity(),
                note.pitch_hz
            );
            return false;
        }
        true
    }

    /// Queues an oscillator-only note.
    pub fn push_note(&mut self, pitch_hz: f32) -> bool {
        self.push(NoteInitParameters::tone(pitch_hz))
    }

    /// Queues a clip with the oscillator disabled.
    pub fn push_sample(&mut self, clip: ClipId) -> bool {
        self.push(NoteInitParameters::sample(clip))
    }

    pub fn bank(&self) -> &SampleBank {
        &self.bank
    }

    /// Notes queued but not yet picked up by the audio thread.
    pub fn pending(&self) -> usize {
        self.notes.len()
    }

    pub fn stats(&self) -> SynthStats {
        self.metrics.snapshot()
    }
}

/// Audio-thread side of the synth.
pub struct SynthEngine {
    notes: NoteConsumer,
    voices: VoicePool,
    bank: Arc<SampleBank>,
    amp: f32,
    metrics: Arc<SynthMetrics>,
}

impl SynthEngine {
    /// Renders one quantum into `buffer`, overwriting its contents.
    pub fn render_quantum(&mut self, buffer: &mut AudioBuffer<'_>) {
        buffer.clear();

        let started = self.drain_notes();
        let deferred = self.voices.is_full() && !self.notes.is_empty();

        let bank = &*self.bank;
        let amp = self.amp;
        let finished = self
            .voices
            .retain_unordered(|voice| render_voice(voice, buffer, bank, amp));

        self.metrics
            .record_quantum(started, finished, self.voices.len(), deferred);
    }

    /// Moves queued notes into free voices, stopping at the first note that
    /// finds the pool full. That note stays queued.
    fn drain_notes(&mut self) -> usize {
        let mut started = 0;
        while !self.voices.is_full() {
            let Some(note) = self.notes.pop() else {
                break;
            };
            if self.voices.spawn(note).is_some() {
                started += 1;
            }
        }
        started
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Notes waiting in the queue.
    pub fn pending(&self) -> usize {
        self.notes.len()
    }

    /// Linear per-voice amplitude.
    pub fn amp(&self) -> f32 {
        self.amp
    }
}

impl AudioCallback for SynthEngine {
    fn render(&mut self, buffer: &mut AudioBuffer<'_>) {
        self.render_quantum(buffer);
    }
}

/// Renders one voice for the whole buffer. Returns `false` once it has ended.
fn render_voice(
    voice: &mut PlayingNote,
    buffer: &mut AudioBuffer<'_>,
    bank: &SampleBank,
    amp: f32,
) -> bool {
    let sample_rate = buffer.sample_rate() as f64;
    let phase_delta = if sample_rate > 0.0 {
        voice.init.pitch_hz as f64 / sample_rate
    } else {
        0.0
    };

    let mut phase = voice.phase;
    let mut decayed = false;
    for frame in buffer.frames_mut() {
        let env = envelope(phase);
        let y = (env * amp as f64 * (TAU * phase).sin()) as f32;
        let value = FULL_SCALE * y;
        for sample in frame {
            saturating_add_sample(sample, value);
        }
        phase += phase_delta;
        decayed = env < RELEASE_THRESHOLD;
    }
    voice.phase = phase;

    let source_exhausted = match voice.init.source.and_then(|id| bank.get(id)) {
        Some(clip) => {
            voice.source_frame_cursor = mix(clip, buffer, amp, voice.source_frame_cursor);
            voice.source_frame_cursor >= clip.frames()
        }
        None => true,
    };

    // A silent oscillator never decays, so sample-only voices live as long as their clip.
    let ended = if voice.init.pitch_hz > 0.0 {
        decayed
    } else {
        source_exhausted
    };
    !ended
}
