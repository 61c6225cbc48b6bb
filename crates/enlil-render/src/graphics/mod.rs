//! Per-frame graphics context: rendering state plus the draw protocol that
//! turns scene draw calls into backend traffic.
//!
//! Responsibilities:
//! - track transform / clip / paint / stroke / composite state for one pass
//! - keep the simple-translate fast-path cache coherent on every mutation
//! - resolve proportional-paint bounds at draw time
//! - route texture draws through the mask/texture dual dispatch and emit
//!   batched quads
//!
//! One context serves exactly one render thread for one frame's traversal of
//! one render target; no operation suspends, blocks, or fails.

mod camera;
mod composite;
mod shape;
mod state;

pub use camera::{Camera, PerspectiveCamera};
pub use composite::CompositeMode;
pub use shape::Shape;
pub use state::{RenderState, SimpleTranslate};

use crate::backend::{RenderBackend, RenderTarget, VertexSink};
use crate::coords::{Affine3, Rect};
use crate::paint::{Color, Paint, Stroke};
use crate::texture::Texture;

/// Graphics context bound to a render target for the duration of one pass.
///
/// Created per pass, mutated through it, discarded at pass end. State
/// mutators are synchronous in-memory updates; draw calls validate against
/// the backend and append to its vertex batch.
pub struct Graphics<'a, B: RenderBackend> {
    backend: &'a mut B,
    state: RenderState,
    target_width: u32,
    target_height: u32,
}

impl<'a, B: RenderBackend> Graphics<'a, B> {
    /// Binds a context to `target`; the device clip starts as the target's
    /// full content bounds.
    pub fn new(backend: &'a mut B, target: &impl RenderTarget) -> Self {
        let (w, h) = (target.content_width(), target.content_height());
        Self {
            backend,
            state: RenderState::new(Rect::new(0.0, 0.0, w as f32, h as f32)),
            target_width: w,
            target_height: h,
        }
    }

    // ── transform ─────────────────────────────────────────────────────────

    /// Replaces the transform; `None` resets to identity.
    pub fn set_transform(&mut self, transform: Option<&Affine3>) {
        self.state.set_transform(transform);
    }

    /// Replaces the transform with a 2D affine `(xx, xy, tx, yx, yy, ty)`.
    pub fn set_transform_2d(&mut self, xx: f32, xy: f32, tx: f32, yx: f32, yy: f32, ty: f32) {
        self.state.set_transform_2d(xx, xy, tx, yx, yy, ty);
    }

    /// Replaces the transform with a full 3D affine, rows X, Y, Z.
    #[allow(clippy::too_many_arguments)]
    pub fn set_transform_3d(
        &mut self,
        xx: f32, xy: f32, xz: f32, tx: f32,
        yx: f32, yy: f32, yz: f32, ty: f32,
        zx: f32, zy: f32, zz: f32, tz: f32,
    ) {
        self.state.set_transform_3d(xx, xy, xz, tx, yx, yy, yz, ty, zx, zy, zz, tz);
    }

    /// Concatenates `transform` onto the current transform (applied first).
    pub fn concat_transform(&mut self, transform: &Affine3) {
        self.state.concat_transform(transform);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.state.translate(tx, ty);
    }

    pub fn translate_3d(&mut self, tx: f32, ty: f32, tz: f32) {
        self.state.translate_3d(tx, ty, tz);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.scale(sx, sy);
    }

    pub fn scale_3d(&mut self, sx: f32, sy: f32, sz: f32) {
        self.state.scale_3d(sx, sy, sz);
    }

    /// Defensive copy of the transform.
    #[inline]
    pub fn transform(&self) -> Affine3 {
        self.state.transform()
    }

    /// Borrowed transform for performance-sensitive callers.
    #[inline]
    pub fn transform_ref(&self) -> &Affine3 {
        self.state.transform_ref()
    }

    // ── clip ──────────────────────────────────────────────────────────────

    /// Replaces the clip rectangle. The final clip becomes the device bounds
    /// intersected with `clip` (or the device bounds alone for `None`);
    /// previous clip state is fully discarded.
    pub fn set_clip_rect(&mut self, clip: Option<Rect>) {
        self.state.set_clip_rect(clip);
    }

    /// The node-supplied clip rectangle, if any (copy).
    #[inline]
    pub fn clip_rect(&self) -> Option<Rect> {
        self.state.clip_rect()
    }

    /// Device clip intersected with the node clip.
    #[inline]
    pub fn final_clip(&self) -> Rect {
        self.state.final_clip()
    }

    // ── paint / stroke / scalars ──────────────────────────────────────────

    pub fn set_paint(&mut self, paint: Paint) {
        self.state.set_paint(paint);
    }

    #[inline]
    pub fn paint(&self) -> &Paint {
        self.state.paint()
    }

    pub fn set_stroke(&mut self, stroke: Stroke) {
        self.state.set_stroke(stroke);
    }

    #[inline]
    pub fn stroke(&self) -> Stroke {
        self.state.stroke()
    }

    pub fn set_extra_alpha(&mut self, extra_alpha: f32) {
        self.state.set_extra_alpha(extra_alpha);
    }

    #[inline]
    pub fn extra_alpha(&self) -> f32 {
        self.state.extra_alpha()
    }

    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.set_composite_mode(mode);
    }

    #[inline]
    pub fn composite_mode(&self) -> CompositeMode {
        self.state.composite_mode()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.state.set_camera(camera);
    }

    #[inline]
    pub fn camera(&self) -> Camera {
        self.state.camera()
    }

    /// True while the default parallel projection is active.
    #[inline]
    pub fn has_parallel_camera(&self) -> bool {
        self.state.camera().is_parallel()
    }

    pub fn set_depth_test(&mut self, depth_test: bool) {
        self.state.set_depth_test(depth_test);
    }

    #[inline]
    pub fn is_depth_test(&self) -> bool {
        self.state.is_depth_test()
    }

    pub fn set_depth_buffer(&mut self, depth_buffer: bool) {
        self.state.set_depth_buffer(depth_buffer);
    }

    #[inline]
    pub fn is_depth_buffer(&self) -> bool {
        self.state.is_depth_buffer()
    }

    /// Installs the bounds override used to resolve proportional paints in
    /// place of per-shape bounds.
    pub fn set_node_bounds(&mut self, bounds: Option<Rect>) {
        self.state.set_node_bounds(bounds);
    }

    #[inline]
    pub fn simple_translate(&self) -> SimpleTranslate {
        self.state.simple_translate()
    }

    #[inline]
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    #[inline]
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    // ── shapes ────────────────────────────────────────────────────────────

    /// Fills `shape` with the current paint.
    pub fn fill(&mut self, shape: &Shape) {
        let bounds = self.resolve_paint_bounds(shape);
        self.backend.render_shape(&self.state, shape, None, bounds);
    }

    /// Outlines `shape` with the current paint and stroke.
    pub fn draw(&mut self, shape: &Shape) {
        let bounds = self.resolve_paint_bounds(shape);
        let stroke = self.state.stroke();
        self.backend.render_shape(&self.state, shape, Some(&stroke), bounds);
    }

    /// Clears the render target to `color`.
    pub fn clear(&mut self, color: Color) {
        self.backend.clear(color);
    }

    /// Clears the render target to transparent.
    pub fn clear_transparent(&mut self) {
        self.clear(Color::TRANSPARENT);
    }

    fn resolve_paint_bounds(&self, shape: &Shape) -> Rect {
        if self.state.paint().is_proportional() {
            self.state.node_bounds().unwrap_or_else(|| shape.bounds())
        } else {
            Rect::default()
        }
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Draws the texture's `w × h` top-left content region at `(x, y)`.
    pub fn draw_texture(&mut self, tex: &B::Texture, x: f32, y: f32, w: f32, h: f32) {
        self.draw_texture_quad(tex, x, y, x + w, y + h, 0.0, 0.0, w, h);
    }

    /// Draws the pixel-space source region `(sx1, sy1)..(sx2, sy2)` into the
    /// destination region `(dx1, dy1)..(dx2, dy2)`.
    ///
    /// `dx1 <= dx2` and `dy1 <= dy2` are assumed and unchecked; flipped
    /// coordinates are unsupported.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_texture_quad(
        &mut self,
        tex: &B::Texture,
        mut dx1: f32, mut dy1: f32, mut dx2: f32, mut dy2: f32,
        sx1: f32, sy1: f32, sx2: f32, sy2: f32,
    ) {
        let st = self.state.simple_translate();
        let xform = self.effective_transform(st);
        self.validate_texture_draw(tex, &xform, dx1, dy1, dx2, dy2);
        if st.active {
            // Paint-op bounds above use the untranslated coordinates so
            // proportional paints resolve in node space; only the emitted
            // geometry is offset.
            dx1 += st.tx;
            dy1 += st.ty;
            dx2 += st.tx;
            dy2 += st.ty;
        }

        let (tx1, ty1) = tex.desc().uv(sx1, sy1);
        let (tx2, ty2) = tex.desc().uv(sx2, sy2);
        self.backend.batch().add_quad(dx1, dy1, dx2, dy2, tx1, ty1, tx2, ty2);
    }

    /// Like [`draw_texture_quad`](Self::draw_texture_quad) with separate top
    /// and bottom opacity, for vertically faded draws (e.g. reflections).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_texture_vo(
        &mut self,
        tex: &B::Texture,
        top_opacity: f32, bot_opacity: f32,
        mut dx1: f32, mut dy1: f32, mut dx2: f32, mut dy2: f32,
        sx1: f32, sy1: f32, sx2: f32, sy2: f32,
    ) {
        let st = self.state.simple_translate();
        let xform = self.effective_transform(st);
        self.validate_texture_draw(tex, &xform, dx1, dy1, dx2, dy2);
        if st.active {
            dx1 += st.tx;
            dy1 += st.ty;
            dx2 += st.tx;
            dy2 += st.ty;
        }

        let (tx1, ty1) = tex.desc().uv(sx1, sy1);
        let (tx2, ty2) = tex.desc().uv(sx2, sy2);
        if top_opacity == 1.0 && bot_opacity == 1.0 {
            self.backend.batch().add_quad(dx1, dy1, dx2, dy2, tx1, ty1, tx2, ty2);
        } else {
            let extra = self.state.extra_alpha();
            self.backend.batch().add_quad_vo(
                top_opacity * extra,
                bot_opacity * extra,
                dx1, dy1, dx2, dy2,
                tx1, ty1, tx2, ty2,
            );
        }
    }

    /// Draws with caller-supplied normalized texture coordinates, bypassing
    /// content-rect resolution.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_texture_raw(
        &mut self,
        tex: &B::Texture,
        mut dx1: f32, mut dy1: f32, mut dx2: f32, mut dy2: f32,
        tx1: f32, ty1: f32, tx2: f32, ty2: f32,
    ) {
        // Mask bounds need the untranslated destination.
        let (bx, by, bw, bh) = (dx1, dy1, dx2 - dx1, dy2 - dy1);
        let st = self.state.simple_translate();
        let xform = self.effective_transform(st);
        if st.active {
            dx1 += st.tx;
            dy1 += st.ty;
            dx2 += st.tx;
            dy2 += st.ty;
        }

        let format = tex.desc().format;
        if format.is_alpha_mask() {
            self.backend.validate_paint_op(&self.state, &xform, Some(tex), bx, by, bw, bh);
        } else {
            self.backend.validate_texture_op(&self.state, &xform, tex, format);
        }

        self.backend.batch().add_quad(dx1, dy1, dx2, dy2, tx1, ty1, tx2, ty2);
    }

    /// Draws with an independent normalized texture coordinate per corner
    /// (top-left, top-right, bottom-left, bottom-right).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_mapped_texture_raw(
        &mut self,
        tex: &B::Texture,
        mut dx1: f32, mut dy1: f32, mut dx2: f32, mut dy2: f32,
        tx11: f32, ty11: f32, tx21: f32, ty21: f32,
        tx12: f32, ty12: f32, tx22: f32, ty22: f32,
    ) {
        let (bx, by, bw, bh) = (dx1, dy1, dx2 - dx1, dy2 - dy1);
        let st = self.state.simple_translate();
        let xform = self.effective_transform(st);
        if st.active {
            dx1 += st.tx;
            dy1 += st.ty;
            dx2 += st.tx;
            dy2 += st.ty;
        }

        let format = tex.desc().format;
        if format.is_alpha_mask() {
            self.backend.validate_paint_op(&self.state, &xform, Some(tex), bx, by, bw, bh);
        } else {
            self.backend.validate_texture_op(&self.state, &xform, tex, format);
        }

        self.backend.batch().add_mapped_quad(
            dx1, dy1, dx2, dy2,
            tx11, ty11, tx21, ty21,
            tx12, ty12, tx22, ty22,
        );
    }

    #[inline]
    fn effective_transform(&self, st: SimpleTranslate) -> Affine3 {
        if st.active { Affine3::IDENTITY } else { self.state.transform() }
    }

    /// Mask/texture dual dispatch: single-channel alpha masks modulate the
    /// active paint and validate through the paint pipeline; every other
    /// format validates as a plain textured-quad operation.
    fn validate_texture_draw(
        &mut self,
        tex: &B::Texture,
        xform: &Affine3,
        dx1: f32, dy1: f32, dx2: f32, dy2: f32,
    ) {
        let format = tex.desc().format;
        if format.is_alpha_mask() {
            self.backend
                .validate_paint_op(&self.state, xform, Some(tex), dx1, dy1, dx2 - dx1, dy2 - dy1);
        } else {
            self.backend.validate_texture_op(&self.state, xform, tex, format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordingBackend, SurfaceTarget, ValidateCall};
    use crate::coords::Vec2;
    use crate::paint::{ColorStop, LinearGradient, SpreadMode};
    use crate::texture::{CpuTexture, PixelFormat, TextureDesc, WrapMode};

    fn target() -> SurfaceTarget {
        SurfaceTarget::new(800, 600)
    }

    fn tex(format: PixelFormat, w: u32, h: u32) -> CpuTexture {
        CpuTexture::new(TextureDesc::simple(format, WrapMode::ClampToEdge, w, h))
    }

    fn proportional_gradient() -> Paint {
        Paint::LinearGradient(
            LinearGradient::new(
                Vec2::zero(),
                Vec2::new(1.0, 0.0),
                vec![
                    ColorStop::new(0.0, Color::WHITE),
                    ColorStop::new(1.0, Color::TRANSPARENT),
                ],
                SpreadMode::Pad,
            )
            .proportional(),
        )
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn device_clip_comes_from_target_content_bounds() {
        let mut backend = RecordingBackend::new();
        let g = Graphics::new(&mut backend, &target());
        assert_eq!(g.final_clip(), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(g.target_width(), 800);
        assert_eq!(g.target_height(), 600);
    }

    // ── clip copy semantics ───────────────────────────────────────────────

    #[test]
    fn clip_rect_getter_returns_equal_copy() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        g.set_clip_rect(Some(r));

        let mut got = g.clip_rect().unwrap();
        assert_eq!(got, r);
        // Mutating the returned rectangle must not affect internal state.
        got.origin.x = -999.0;
        assert_eq!(g.clip_rect().unwrap(), r);
    }

    // ── shape protocol ────────────────────────────────────────────────────

    #[test]
    fn fill_with_plain_paint_passes_zero_bounds_and_no_stroke() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.fill(&Shape::Rect(Rect::new(5.0, 5.0, 10.0, 10.0)));

        let s = &backend.shapes[0];
        assert_eq!(s.stroke, None);
        assert_eq!(s.bounds, Rect::default());
    }

    #[test]
    fn fill_with_proportional_paint_resolves_shape_bounds() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.set_paint(proportional_gradient());
        g.fill(&Shape::Rect(Rect::new(5.0, 6.0, 10.0, 12.0)));

        assert_eq!(backend.shapes[0].bounds, Rect::new(5.0, 6.0, 10.0, 12.0));
    }

    #[test]
    fn node_bounds_override_wins_over_shape_bounds() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.set_paint(proportional_gradient());
        g.set_node_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        g.fill(&Shape::Rect(Rect::new(5.0, 6.0, 10.0, 12.0)));

        assert_eq!(backend.shapes[0].bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn draw_passes_current_stroke() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let stroke = Stroke { width: 3.0, ..Stroke::default() };
        g.set_stroke(stroke);
        g.draw(&Shape::Line(Vec2::zero(), Vec2::new(10.0, 0.0)));

        assert_eq!(backend.shapes[0].stroke, Some(stroke));
    }

    #[test]
    fn clear_reaches_backend() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.clear_transparent();
        assert_eq!(backend.clears, vec![Color::TRANSPARENT]);
    }

    // ── texture dual dispatch ─────────────────────────────────────────────

    #[test]
    fn mask_format_always_validates_paint_path() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let mask = tex(PixelFormat::ByteAlpha, 16, 16);

        g.draw_texture(&mask, 0.0, 0.0, 16.0, 16.0);
        g.draw_texture_raw(&mask, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 1.0, 1.0);
        g.draw_texture_vo(&mask, 1.0, 1.0, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 16.0, 16.0);
        g.draw_mapped_texture_raw(
            &mask, 0.0, 0.0, 16.0, 16.0,
            0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0,
        );

        assert_eq!(backend.paint_op_count(), 4);
        assert_eq!(backend.texture_op_count(), 0);
    }

    #[test]
    fn non_mask_format_always_validates_texture_path() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let rgba = tex(PixelFormat::ByteBgraPre, 16, 16);

        g.draw_texture(&rgba, 0.0, 0.0, 16.0, 16.0);
        g.draw_texture_raw(&rgba, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 1.0, 1.0);
        g.draw_texture_vo(&rgba, 1.0, 1.0, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 16.0, 16.0);
        g.draw_mapped_texture_raw(
            &rgba, 0.0, 0.0, 16.0, 16.0,
            0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0,
        );

        assert_eq!(backend.texture_op_count(), 4);
        assert_eq!(backend.paint_op_count(), 0);

        let ValidateCall::TextureOp { format, .. } = &backend.validations[0] else {
            panic!("expected texture op");
        };
        assert_eq!(*format, PixelFormat::ByteBgraPre);
    }

    // ── simple-translate fast path ────────────────────────────────────────

    #[test]
    fn simple_translate_offsets_emitted_geometry() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.translate(100.0, 50.0);
        let rgba = tex(PixelFormat::ByteBgraPre, 32, 32);
        g.draw_texture(&rgba, 0.0, 0.0, 32.0, 32.0);

        let v = backend.quads().vertices();
        assert_eq!(v[0].pos, [100.0, 50.0]);
        assert_eq!(v[2].pos, [132.0, 82.0]);
    }

    #[test]
    fn simple_translate_passes_identity_to_validate() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.translate(100.0, 50.0);
        let rgba = tex(PixelFormat::ByteBgraPre, 32, 32);
        g.draw_texture(&rgba, 0.0, 0.0, 32.0, 32.0);

        let ValidateCall::TextureOp { xform, .. } = &backend.validations[0] else {
            panic!("expected texture op");
        };
        assert!(xform.is_identity());
    }

    #[test]
    fn mask_bounds_use_pre_translation_coordinates() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.translate(100.0, 50.0);
        let mask = tex(PixelFormat::ByteAlpha, 32, 32);
        g.draw_texture(&mask, 10.0, 20.0, 32.0, 32.0);

        // Validate bounds stay in node space; only geometry is offset.
        let ValidateCall::PaintOp { bounds, .. } = &backend.validations[0] else {
            panic!("expected paint op");
        };
        assert_eq!(*bounds, Rect::new(10.0, 20.0, 32.0, 32.0));

        let v = backend.quads().vertices();
        assert_eq!(v[0].pos, [110.0, 70.0]);
    }

    #[test]
    fn scaled_transform_is_passed_through_and_geometry_is_not_offset() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.translate(100.0, 50.0);
        g.scale(2.0, 2.0);
        let rgba = tex(PixelFormat::ByteBgraPre, 32, 32);
        g.draw_texture(&rgba, 0.0, 0.0, 32.0, 32.0);
        let expected = g.transform();

        let ValidateCall::TextureOp { xform, .. } = &backend.validations[0] else {
            panic!("expected texture op");
        };
        assert_eq!(*xform, expected);
        assert!(!xform.is_identity());

        let v = backend.quads().vertices();
        assert_eq!(v[0].pos, [0.0, 0.0]);
    }

    // ── texture coordinates ───────────────────────────────────────────────

    #[test]
    fn uv_derived_from_physical_dims_and_content_origin() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let padded = CpuTexture::new(TextureDesc {
            format: PixelFormat::ByteBgraPre,
            wrap_mode: WrapMode::ClampToEdge,
            physical_width: 128,
            physical_height: 128,
            content_x: 8,
            content_y: 16,
            content_width: 100,
            content_height: 100,
        });
        g.draw_texture_quad(&padded, 0.0, 0.0, 50.0, 50.0, 0.0, 0.0, 50.0, 50.0);

        let v = backend.quads().vertices();
        assert_eq!(v[0].uv, [8.0 / 128.0, 16.0 / 128.0]);
        assert_eq!(v[2].uv, [58.0 / 128.0, 66.0 / 128.0]);
    }

    #[test]
    fn raw_uv_is_passed_unmodified() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let rgba = tex(PixelFormat::ByteBgraPre, 64, 64);
        g.draw_texture_raw(&rgba, 0.0, 0.0, 10.0, 10.0, 0.25, 0.25, 0.75, 0.75);

        let v = backend.quads().vertices();
        assert_eq!(v[0].uv, [0.25, 0.25]);
        assert_eq!(v[2].uv, [0.75, 0.75]);
    }

    #[test]
    fn mapped_quad_corners_arrive_in_order() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let rgba = tex(PixelFormat::ByteBgraPre, 64, 64);
        g.draw_mapped_texture_raw(
            &rgba, 0.0, 0.0, 10.0, 10.0,
            0.1, 0.2, // top-left
            0.3, 0.4, // top-right
            0.5, 0.6, // bottom-left
            0.7, 0.8, // bottom-right
        );

        let v = backend.quads().vertices();
        assert_eq!(v[0].uv, [0.1, 0.2]);
        assert_eq!(v[1].uv, [0.3, 0.4]);
        assert_eq!(v[2].uv, [0.7, 0.8]);
        assert_eq!(v[3].uv, [0.5, 0.6]);
    }

    // ── per-vertex opacity ────────────────────────────────────────────────

    #[test]
    fn full_opacity_vo_collapses_to_plain_quad() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let rgba = tex(PixelFormat::ByteBgraPre, 16, 16);
        g.draw_texture_vo(&rgba, 1.0, 1.0, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 16.0, 16.0);

        let v = backend.quads().vertices();
        // All four vertices carry the uniform texture-op color.
        assert!(v.iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn partial_opacity_vo_multiplies_extra_alpha() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.set_extra_alpha(0.5);
        let rgba = tex(PixelFormat::ByteBgraPre, 16, 16);
        g.draw_texture_vo(&rgba, 1.0, 0.5, 0.0, 0.0, 16.0, 16.0, 0.0, 0.0, 16.0, 16.0);

        let v = backend.quads().vertices();
        // Texture-op base color is white × extra_alpha (0.5); the top row is
        // further scaled by 1.0 × 0.5, the bottom row by 0.5 × 0.5.
        assert_eq!(v[0].color, [0.25, 0.25, 0.25, 0.25]);
        assert_eq!(v[2].color, [0.125, 0.125, 0.125, 0.125]);
    }

    #[test]
    fn extra_alpha_scales_texture_op_color() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        g.set_extra_alpha(0.25);
        let rgba = tex(PixelFormat::ByteBgraPre, 16, 16);
        g.draw_texture(&rgba, 0.0, 0.0, 16.0, 16.0);

        let v = backend.quads().vertices();
        assert!(v.iter().all(|v| v.color == [0.25, 0.25, 0.25, 0.25]));
    }

    // ── convenience form ──────────────────────────────────────────────────

    #[test]
    fn draw_texture_expands_to_matching_src_and_dst() {
        let mut backend = RecordingBackend::new();
        let mut g = Graphics::new(&mut backend, &target());
        let rgba = tex(PixelFormat::ByteBgraPre, 64, 64);
        g.draw_texture(&rgba, 10.0, 20.0, 32.0, 16.0);

        let v = backend.quads().vertices();
        assert_eq!(v[0].pos, [10.0, 20.0]);
        assert_eq!(v[2].pos, [42.0, 36.0]);
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[2].uv, [0.5, 0.25]);
    }
}
