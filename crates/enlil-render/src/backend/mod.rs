//! Backend seam for the graphics context.
//!
//! The context translates draw calls into two kinds of backend traffic:
//! validate-ops (state changes the backend must observe before vertex data
//! referencing them arrives) and vertex emission into a [`VertexSink`].
//! Backends implement [`RenderBackend`]; [`QuadBatch`] is the shared sink
//! implementation, [`RecordingBackend`] a spy for tests.

mod batch;
mod recording;

pub use batch::{QuadBatch, QuadVertex};
pub use recording::{RecordedShape, RecordingBackend, ValidateCall};

use crate::coords::{Affine3, Rect};
use crate::graphics::{RenderState, Shape};
use crate::paint::{Color, Stroke};
use crate::texture::{PixelFormat, Texture};

/// Surface being drawn to. Content dimensions seed the context's device clip.
pub trait RenderTarget {
    fn content_width(&self) -> u32;
    fn content_height(&self) -> u32;
}

/// Plain width/height target for offscreen passes and tests.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceTarget {
    pub width: u32,
    pub height: u32,
}

impl SurfaceTarget {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderTarget for SurfaceTarget {
    #[inline]
    fn content_width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn content_height(&self) -> u32 {
        self.height
    }
}

/// Destination for batched quad geometry.
///
/// Coordinates are destination pixels (pre-projection); texture coordinates
/// are normalized. The sink carries a current color applied to every emitted
/// vertex; validate-ops set it before geometry arrives.
///
/// Callers are trusted to pass `dx1 <= dx2` and `dy1 <= dy2`; flipped
/// coordinates are unsupported and produce unspecified geometry.
pub trait VertexSink {
    /// Sets the color applied to subsequently emitted vertices.
    fn set_color(&mut self, color: [f32; 4]);

    /// Emits one axis-aligned textured quad.
    #[allow(clippy::too_many_arguments)]
    fn add_quad(
        &mut self,
        dx1: f32, dy1: f32, dx2: f32, dy2: f32,
        tx1: f32, ty1: f32, tx2: f32, ty2: f32,
    );

    /// Emits one quad with the current color scaled by `top`/`bot` opacity on
    /// the respective vertex rows.
    #[allow(clippy::too_many_arguments)]
    fn add_quad_vo(
        &mut self,
        top: f32, bot: f32,
        dx1: f32, dy1: f32, dx2: f32, dy2: f32,
        tx1: f32, ty1: f32, tx2: f32, ty2: f32,
    );

    /// Emits one quad with independently mapped texture coordinates per
    /// corner: `(tx11, ty11)` top-left, `(tx21, ty21)` top-right,
    /// `(tx12, ty12)` bottom-left, `(tx22, ty22)` bottom-right.
    #[allow(clippy::too_many_arguments)]
    fn add_mapped_quad(
        &mut self,
        dx1: f32, dy1: f32, dx2: f32, dy2: f32,
        tx11: f32, ty11: f32, tx21: f32, ty21: f32,
        tx12: f32, ty12: f32, tx22: f32, ty22: f32,
    );
}

/// Rendering backend driven by a [`Graphics`](crate::graphics::Graphics)
/// context for the duration of one pass.
///
/// The validate-ops mirror the dual dispatch of texture draws: alpha-mask
/// textures composite through the paint pipeline (`validate_paint_op`, with
/// the pre-translation bounds for proportional-paint resolution), all other
/// formats composite directly (`validate_texture_op`). Backends typically use
/// these calls to flush batched geometry when the keyed state (texture,
/// transform, composite mode, clip) changes.
pub trait RenderBackend {
    type Texture: Texture;
    type Batch: VertexSink;

    #[allow(clippy::too_many_arguments)]
    fn validate_paint_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        mask: Option<&Self::Texture>,
        bx: f32,
        by: f32,
        bw: f32,
        bh: f32,
    );

    fn validate_texture_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        texture: &Self::Texture,
        format: PixelFormat,
    );

    /// The current vertex batch. Valid only between validate-ops that refer
    /// to the same keyed state.
    fn batch(&mut self) -> &mut Self::Batch;

    /// Renders shape geometry with the resolved paint bounds (`stroke` is
    /// `None` for fills).
    fn render_shape(
        &mut self,
        state: &RenderState,
        shape: &Shape,
        stroke: Option<&Stroke>,
        bounds: Rect,
    );

    /// Clears the render target to `color`.
    fn clear(&mut self, color: Color);
}
