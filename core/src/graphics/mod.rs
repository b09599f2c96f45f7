//! Minimal 2D renderer: quads batched on the CPU, drawn with one wgpu pipeline.

mod batch;
mod presenter;

pub use batch::{Color, DrawRun, QuadBatch, QuadVertex, TextureId, to_ndc};
pub use presenter::Presenter;
