use crate::coords::{Affine3, Rect};
use crate::paint::{Paint, Stroke};

use super::{Camera, CompositeMode};

/// Fast-path cache derived from the current transform and paint.
///
/// `active` is true iff the transform is identity-or-pure-translation AND the
/// paint is a flat color; `tx`/`ty` then hold the transform's translation
/// components, otherwise `(0, 0)`. Draws consult the cache to offset geometry
/// on the CPU instead of pushing a full matrix to the backend.
///
/// The cache is recomputed synchronously inside every transform- or
/// paint-affecting mutator; there is no dirty flag and no lazy path, so it can
/// never be observed stale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimpleTranslate {
    pub active: bool,
    pub tx: f32,
    pub ty: f32,
}

impl SimpleTranslate {
    fn compute(transform: &Affine3, paint: &Paint) -> Self {
        if transform.is_translate_or_identity() && paint.is_flat_color() {
            let (tx, ty) = transform.translation();
            Self { active: true, tx, ty }
        } else {
            Self { active: false, tx: 0.0, ty: 0.0 }
        }
    }
}

/// Mutable per-pass rendering state.
///
/// One instance lives inside each [`Graphics`](super::Graphics) context: bound
/// to a render target at construction, mutated through the pass, discarded at
/// pass end. Never shared across threads or passes. Mutation goes through the
/// context; backends receive `&RenderState` and read it through the accessors.
#[derive(Debug, Clone)]
pub struct RenderState {
    transform: Affine3,
    camera: Camera,
    /// Device-space clip fixed at construction from the render target's
    /// content bounds.
    device_clip: Rect,
    /// `device_clip ∩ clip_rect`, or `device_clip` alone when no clip is set.
    final_clip: Rect,
    clip_rect: Option<Rect>,
    /// Scene-supplied bounds override for proportional-paint resolution.
    node_bounds: Option<Rect>,
    paint: Paint,
    stroke: Stroke,
    extra_alpha: f32,
    composite_mode: CompositeMode,
    depth_test: bool,
    depth_buffer: bool,
    simple: SimpleTranslate,
}

impl RenderState {
    pub(crate) fn new(device_clip: Rect) -> Self {
        let transform = Affine3::IDENTITY;
        let paint = Paint::default();
        let simple = SimpleTranslate::compute(&transform, &paint);
        Self {
            transform,
            camera: Camera::default(),
            device_clip,
            final_clip: device_clip,
            clip_rect: None,
            node_bounds: None,
            paint,
            stroke: Stroke::default(),
            extra_alpha: 1.0,
            composite_mode: CompositeMode::default(),
            depth_test: false,
            depth_buffer: false,
            simple,
        }
    }

    #[inline]
    fn revalidate_transform_and_paint(&mut self) {
        self.simple = SimpleTranslate::compute(&self.transform, &self.paint);
    }

    // ── transform ─────────────────────────────────────────────────────────

    /// Replaces the transform; `None` resets to identity.
    pub(crate) fn set_transform(&mut self, transform: Option<&Affine3>) {
        self.transform = transform.copied().unwrap_or(Affine3::IDENTITY);
        self.revalidate_transform_and_paint();
    }

    pub(crate) fn set_transform_2d(&mut self, xx: f32, xy: f32, tx: f32, yx: f32, yy: f32, ty: f32) {
        self.transform = Affine3::from_2d(xx, xy, tx, yx, yy, ty);
        self.revalidate_transform_and_paint();
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn set_transform_3d(
        &mut self,
        xx: f32, xy: f32, xz: f32, tx: f32,
        yx: f32, yy: f32, yz: f32, ty: f32,
        zx: f32, zy: f32, zz: f32, tz: f32,
    ) {
        self.transform = Affine3 { xx, xy, xz, tx, yx, yy, yz, ty, zx, zy, zz, tz };
        self.revalidate_transform_and_paint();
    }

    pub(crate) fn concat_transform(&mut self, other: &Affine3) {
        self.transform = self.transform.concat(other);
        self.revalidate_transform_and_paint();
    }

    pub(crate) fn translate(&mut self, tx: f32, ty: f32) {
        self.translate_3d(tx, ty, 0.0);
    }

    pub(crate) fn translate_3d(&mut self, tx: f32, ty: f32, tz: f32) {
        if tx != 0.0 || ty != 0.0 || tz != 0.0 {
            self.transform = self.transform.translated(tx, ty, tz);
            self.revalidate_transform_and_paint();
        }
    }

    pub(crate) fn scale(&mut self, sx: f32, sy: f32) {
        self.scale_3d(sx, sy, 1.0);
    }

    pub(crate) fn scale_3d(&mut self, sx: f32, sy: f32, sz: f32) {
        if sx != 1.0 || sy != 1.0 || sz != 1.0 {
            self.transform = self.transform.scaled(sx, sy, sz);
            self.revalidate_transform_and_paint();
        }
    }

    // ── clip ──────────────────────────────────────────────────────────────

    /// Replaces the clip rectangle (no accumulation: any save/restore
    /// stacking is a collaborator's responsibility). The final clip is
    /// rebuilt from the device bounds on every call.
    pub(crate) fn set_clip_rect(&mut self, clip: Option<Rect>) {
        self.final_clip = self.device_clip;
        self.clip_rect = clip;
        if let Some(r) = clip {
            self.final_clip = self.final_clip.intersection(r);
        }
    }

    // ── paint / stroke / scalars ──────────────────────────────────────────

    pub(crate) fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
        self.revalidate_transform_and_paint();
    }

    pub(crate) fn set_stroke(&mut self, stroke: Stroke) {
        self.stroke = stroke;
    }

    pub(crate) fn set_extra_alpha(&mut self, extra_alpha: f32) {
        self.extra_alpha = extra_alpha;
    }

    pub(crate) fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite_mode = mode;
    }

    pub(crate) fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub(crate) fn set_depth_test(&mut self, depth_test: bool) {
        self.depth_test = depth_test;
    }

    pub(crate) fn set_depth_buffer(&mut self, depth_buffer: bool) {
        self.depth_buffer = depth_buffer;
    }

    pub(crate) fn set_node_bounds(&mut self, bounds: Option<Rect>) {
        self.node_bounds = bounds;
    }

    // ── accessors ─────────────────────────────────────────────────────────

    /// Defensive copy of the transform.
    #[inline]
    pub fn transform(&self) -> Affine3 {
        self.transform
    }

    /// Borrowed transform for performance-sensitive callers. The borrow ends
    /// before the next mutation can happen, so the no-clone contract is
    /// enforced structurally.
    #[inline]
    pub fn transform_ref(&self) -> &Affine3 {
        &self.transform
    }

    #[inline]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[inline]
    pub fn device_clip(&self) -> Rect {
        self.device_clip
    }

    #[inline]
    pub fn final_clip(&self) -> Rect {
        self.final_clip
    }

    /// The node-supplied clip rectangle, if any (copy).
    #[inline]
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_rect
    }

    #[inline]
    pub fn node_bounds(&self) -> Option<Rect> {
        self.node_bounds
    }

    #[inline]
    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    #[inline]
    pub fn stroke(&self) -> Stroke {
        self.stroke
    }

    #[inline]
    pub fn extra_alpha(&self) -> f32 {
        self.extra_alpha
    }

    #[inline]
    pub fn composite_mode(&self) -> CompositeMode {
        self.composite_mode
    }

    #[inline]
    pub fn is_depth_test(&self) -> bool {
        self.depth_test
    }

    #[inline]
    pub fn is_depth_buffer(&self) -> bool {
        self.depth_buffer
    }

    #[inline]
    pub fn simple_translate(&self) -> SimpleTranslate {
        self.simple
    }
}
