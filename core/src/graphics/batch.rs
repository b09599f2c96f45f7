//! CPU-side quad batching.
//!
//! Quads are given in window pixels with the origin at the top-left and
//! converted to normalized device coordinates when pushed. Consecutive quads
//! sharing a texture form one [`DrawRun`].

use std::ops::Range;

use glam::{UVec2, Vec2};

/// RGBA colour with components in 0.0-1.0.
pub type Color = [f32; 4];

/// GPU texture handle returned by [`Presenter::upload_image`](super::Presenter::upload_image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    /// 1x1 white texture used for untextured quads.
    pub const WHITE: TextureId = TextureId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl QuadVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertices drawn with one texture binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRun {
    pub texture: TextureId,
    pub vertices: Range<u32>,
}

/// One frame's worth of quads.
#[derive(Debug, Clone)]
pub struct QuadBatch {
    viewport: UVec2,
    clear_color: Color,
    vertices: Vec<QuadVertex>,
    runs: Vec<DrawRun>,
}

impl QuadBatch {
    pub fn new(viewport: UVec2) -> Self {
        Self {
            viewport,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Starts a new frame, keeping allocations.
    pub fn begin(&mut self, viewport: UVec2, clear_color: Color) {
        self.viewport = viewport;
        self.clear_color = clear_color;
        self.vertices.clear();
        self.runs.clear();
    }

    pub fn set_clear_color(&mut self, clear_color: Color) {
        self.clear_color = clear_color;
    }

    /// Solid rectangle.
    pub fn rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.push_quad(TextureId::WHITE, min, size, color);
    }

    /// Solid square of side `side` centred on `center`.
    pub fn marker(&mut self, center: Vec2, side: f32, color: Color) {
        let size = Vec2::splat(side);
        self.rect(center - size / 2.0, size, color);
    }

    /// Textured rectangle, multiplied by `tint`.
    pub fn image(&mut self, texture: TextureId, min: Vec2, size: Vec2, tint: Color) {
        self.push_quad(texture, min, size, tint);
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn runs(&self) -> &[DrawRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push_quad(&mut self, texture: TextureId, min: Vec2, size: Vec2, color: Color) {
        if self.viewport.x == 0 || self.viewport.y == 0 {
            return;
        }
        let viewport = self.viewport.as_vec2();
        let max = min + size;
        let corners = [
            (Vec2::new(min.x, min.y), [0.0, 0.0]),
            (Vec2::new(max.x, min.y), [1.0, 0.0]),
            (Vec2::new(max.x, max.y), [1.0, 1.0]),
            (Vec2::new(min.x, max.y), [0.0, 1.0]),
        ];
        let start = self.vertices.len() as u32;
        for i in [0, 1, 2, 0, 2, 3] {
            let (point, uv) = corners[i];
            self.vertices.push(QuadVertex {
                position: to_ndc(point, viewport).to_array(),
                uv,
                color,
            });
        }
        let end = self.vertices.len() as u32;

        match self.runs.last_mut() {
            Some(run) if run.texture == texture => run.vertices.end = end,
            _ => self.runs.push(DrawRun {
                texture,
                vertices: start..end,
            }),
        }
    }
}

/// Window pixels (origin top-left, y down) to NDC (origin centre, y up).
pub fn to_ndc(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        point.x / viewport.x * 2.0 - 1.0,
        1.0 - point.y / viewport.y * 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_ndc_corners() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(viewport / 2.0, viewport), Vec2::ZERO);
    }

    #[test]
    fn test_rect_emits_two_triangles() {
        let mut batch = QuadBatch::new(UVec2::new(100, 100));
        batch.rect(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), RED);

        let vertices = batch.vertices();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[2].position, [0.0, 0.0]);
        assert!(vertices.iter().all(|v| v.color == RED));
    }

    #[test]
    fn test_runs_merge_by_texture() {
        let mut batch = QuadBatch::new(UVec2::new(64, 64));
        let logo = TextureId(1);
        batch.rect(Vec2::ZERO, Vec2::ONE, RED);
        batch.rect(Vec2::ONE, Vec2::ONE, RED);
        batch.image(logo, Vec2::ZERO, Vec2::splat(8.0), [1.0; 4]);
        batch.rect(Vec2::ZERO, Vec2::ONE, RED);

        assert_eq!(
            batch.runs(),
            &[
                DrawRun {
                    texture: TextureId::WHITE,
                    vertices: 0..12
                },
                DrawRun {
                    texture: logo,
                    vertices: 12..18
                },
                DrawRun {
                    texture: TextureId::WHITE,
                    vertices: 18..24
                },
            ]
        );
    }

    #[test]
    fn test_marker_is_centred() {
        let mut batch = QuadBatch::new(UVec2::new(100, 100));
        batch.marker(Vec2::new(50.0, 50.0), 20.0, RED);
        let vertices = batch.vertices();
        let to_px = |ndc: [f32; 2]| ((ndc[0] + 1.0) * 50.0, (1.0 - ndc[1]) * 50.0);
        assert_eq!(to_px(vertices[0].position), (40.0, 40.0));
        assert_eq!(to_px(vertices[2].position), (60.0, 60.0));
    }

    #[test]
    fn test_begin_resets() {
        let mut batch = QuadBatch::new(UVec2::new(10, 10));
        batch.rect(Vec2::ZERO, Vec2::ONE, RED);
        batch.begin(UVec2::new(20, 20), RED);
        assert!(batch.is_empty());
        assert!(batch.runs().is_empty());
        assert_eq!(batch.clear_color(), RED);
        assert_eq!(batch.viewport(), UVec2::new(20, 20));
    }

    #[test]
    fn test_zero_viewport_draws_nothing() {
        let mut batch = QuadBatch::new(UVec2::ZERO);
        batch.rect(Vec2::ZERO, Vec2::ONE, RED);
        assert!(batch.is_empty());
    }
}
