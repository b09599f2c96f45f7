//! Tachyon test programs
//!
//! Scenes shared by the `synth-test` and `latency-test` binaries. Scenes
//! draw into a [`QuadBatch`] from a [`FrameState`], so they run the same
//! against the real [`Platform`] and against test doubles.

pub mod chime;
pub mod latency;

use tachyon_core::{FrameState, Platform, QuadBatch};

/// Read access to the pulled state alongside the batch being drawn.
pub trait SceneTarget {
    fn frame_parts(&mut self) -> (&FrameState, &mut QuadBatch);
}

impl SceneTarget for Platform {
    fn frame_parts(&mut self) -> (&FrameState, &mut QuadBatch) {
        Platform::frame_parts(self)
    }
}

/// Installs the `tracing` subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
