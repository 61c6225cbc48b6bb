use crate::coords::{Affine3, Rect};
use crate::graphics::{RenderState, Shape};
use crate::paint::{Color, Paint, Stroke};
use crate::texture::{CpuTexture, PixelFormat};

use super::{QuadBatch, RenderBackend, VertexSink};

/// One validate-op observed by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidateCall {
    PaintOp {
        xform: Affine3,
        has_mask: bool,
        bounds: Rect,
    },
    TextureOp {
        xform: Affine3,
        format: PixelFormat,
    },
}

/// One shape submission observed by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedShape {
    pub shape: Shape,
    pub stroke: Option<Stroke>,
    pub bounds: Rect,
}

/// Backend spy: records validate-ops, shape submissions, and clears, and
/// batches quads like a real backend would.
///
/// Colors are resolved the way GPU backends resolve them — flat paint
/// (scaled by extra alpha) for paint-ops, white (scaled by extra alpha) for
/// texture-ops — so tests can assert on emitted vertex colors, not just call
/// counts.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub validations: Vec<ValidateCall>,
    pub shapes: Vec<RecordedShape>,
    pub clears: Vec<Color>,
    batch: QuadBatch,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paint_op_count(&self) -> usize {
        self.validations
            .iter()
            .filter(|v| matches!(v, ValidateCall::PaintOp { .. }))
            .count()
    }

    pub fn texture_op_count(&self) -> usize {
        self.validations
            .iter()
            .filter(|v| matches!(v, ValidateCall::TextureOp { .. }))
            .count()
    }

    /// All vertices batched so far.
    pub fn quads(&self) -> &QuadBatch {
        &self.batch
    }
}

impl RenderBackend for RecordingBackend {
    type Texture = CpuTexture;
    type Batch = QuadBatch;

    fn validate_paint_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        mask: Option<&CpuTexture>,
        bx: f32,
        by: f32,
        bw: f32,
        bh: f32,
    ) {
        if let Paint::Solid(c) = state.paint() {
            self.batch.set_color(c.mul_alpha(state.extra_alpha()).to_array());
        }
        self.validations.push(ValidateCall::PaintOp {
            xform: *xform,
            has_mask: mask.is_some(),
            bounds: Rect::new(bx, by, bw, bh),
        });
    }

    fn validate_texture_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        _texture: &CpuTexture,
        format: PixelFormat,
    ) {
        self.batch
            .set_color(Color::WHITE.mul_alpha(state.extra_alpha()).to_array());
        self.validations.push(ValidateCall::TextureOp {
            xform: *xform,
            format,
        });
    }

    fn batch(&mut self) -> &mut QuadBatch {
        &mut self.batch
    }

    fn render_shape(
        &mut self,
        _state: &RenderState,
        shape: &Shape,
        stroke: Option<&Stroke>,
        bounds: Rect,
    ) {
        self.shapes.push(RecordedShape {
            shape: *shape,
            stroke: stroke.copied(),
            bounds,
        });
    }

    fn clear(&mut self, color: Color) {
        self.clears.push(color);
    }
}
