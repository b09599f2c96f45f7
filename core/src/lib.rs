//! Tachyon Core - push/pull platform layer
//!
//! The application owns its main loop. Each iteration it *pulls* window,
//! input and time state from the [`Platform`], draws into a [`QuadBatch`]
//! and *pushes* the frame for presentation. Audio is rendered by a single
//! [`AudioCallback`] on the device thread.
//!
//! # Architecture
//!
//! - [`Platform`] - winit window and event pump, input, clock, presenter, audio device
//! - [`DoublePullLoop`] - pulls twice per frame, sleeping until just before scan-out
//! - [`AudioDevice`] - cpal output stream driving an [`AudioCallback`]
//! - [`Presenter`] - wgpu surface drawing batched quads
//! - [`config`] - TOML settings in the platform config directory

pub mod assets;
pub mod audio;
pub mod config;
pub mod graphics;
pub mod input;
pub mod pacing;
pub mod platform;
pub mod state;
pub mod time;

pub use assets::{AssetError, load_audio, load_image};
pub use audio::{AudioCallback, AudioDevice, AudioError, CancellationToken};
pub use config::{Config, ConfigError};
pub use graphics::{Color, Presenter, QuadBatch, TextureId};
pub use input::{Input, InputConfig};
pub use pacing::{
    DoublePullLoop, FramePlatform, FrameReport, FrameStats, PacedApp, PullPhase, ScanOutPacer,
    Sleeper, ThreadSleeper, TimingAnomaly,
};
pub use platform::{Platform, PlatformError};
pub use state::{FrameState, WindowState};
pub use time::{Clock, Time};
