//! Synth health counters, written by the audio thread and read elsewhere.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared between [`SynthHandle`](crate::SynthHandle) and
/// [`SynthEngine`](crate::SynthEngine).
///
/// All accesses are relaxed: these are diagnostics, nothing synchronizes on them.
#[derive(Debug, Default)]
pub struct SynthMetrics {
    active_voices: AtomicUsize,
    quanta_rendered: AtomicU64,
    notes_started: AtomicU64,
    notes_finished: AtomicU64,
    drains_deferred: AtomicU64,
    notes_dropped: AtomicU64,
}

/// Point-in-time copy of [`SynthMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthStats {
    pub active_voices: usize,
    pub quanta_rendered: u64,
    pub notes_started: u64,
    pub notes_finished: u64,
    /// Quanta that left notes queued because every voice was busy.
    pub drains_deferred: u64,
    /// Notes rejected because the queue was full.
    pub notes_dropped: u64,
}

impl SynthMetrics {
    pub(crate) fn record_quantum(
        &self,
        started: usize,
        finished: usize,
        active: usize,
        deferred: bool,
    ) {
        self.quanta_rendered.fetch_add(1, Ordering::Relaxed);
        if started > 0 {
            self.notes_started
                .fetch_add(started as u64, Ordering::Relaxed);
        }
        if finished > 0 {
            self.notes_finished
                .fetch_add(finished as u64, Ordering::Relaxed);
        }
        if deferred {
            self.drains_deferred.fetch_add(1, Ordering::Relaxed);
        }
        self.active_voices.store(active, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.notes_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SynthStats {
        SynthStats {
            active_voices: self.active_voices.load(Ordering::Relaxed),
            quanta_rendered: self.quanta_rendered.load(Ordering::Relaxed),
            notes_started: self.notes_started.load(Ordering::Relaxed),
            notes_finished: self.notes_finished.load(Ordering::Relaxed),
            drains_deferred: self.drains_deferred.load(Ordering::Relaxed),
            notes_dropped: self.notes_dropped.load(Ordering::Relaxed),
        }
    }
}
