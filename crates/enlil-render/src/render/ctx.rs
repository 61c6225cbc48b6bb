use std::ops::Range;

use crate::backend::{QuadBatch, RenderBackend, SurfaceTarget, VertexSink};
use crate::coords::{Affine3, Rect};
use crate::graphics::{CompositeMode, RenderState, Shape};
use crate::paint::{Color, Paint, Stroke};
use crate::texture::{PixelFormat, Texture};

use super::quads::QuadRenderer;
use super::texture::WgpuTexture;

/// Pipeline family a draw run renders with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) enum RunKind {
    /// Vertex color only (shape fills/strokes).
    Color,
    /// Textured quad modulated by vertex color.
    Textured,
    /// Single-channel mask modulating the paint color.
    Mask,
}

/// Keyed state a batch run is valid under. A validate-op carrying a
/// different key closes the open run and starts a new one.
#[derive(Debug, Clone, PartialEq)]
struct RunKey {
    kind: RunKind,
    /// `(storage id, address mode, linear filtering)` of the sampled view.
    texture: Option<(u64, wgpu::AddressMode, bool)>,
    xform: Affine3,
    composite: CompositeMode,
    clip: Rect,
}

/// A contiguous range of batched quads sharing one keyed state.
#[derive(Debug, Clone)]
pub(crate) struct DrawRun {
    pub kind: RunKind,
    pub texture: Option<WgpuTexture>,
    pub xform: Affine3,
    pub composite: CompositeMode,
    pub clip: Rect,
    pub quads: Range<usize>,
}

struct OpenRun {
    key: RunKey,
    texture: Option<WgpuTexture>,
    quad_start: usize,
}

/// GPU backend: batches validated quad traffic into draw runs and renders
/// them through the quad pipeline at flush time.
///
/// One instance serves one render target; per-frame lifecycle is
/// `Graphics::new(...)` → draw calls → [`flush`](WgpuBackend::flush).
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    scale_factor: f32,

    renderer: QuadRenderer,
    batch: QuadBatch,
    runs: Vec<DrawRun>,
    current: Option<OpenRun>,
    clear_color: Option<Color>,

    warned_non_parallel: bool,
    warned_gradient: bool,
    warned_shape: bool,
}

impl WgpuBackend {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            target_format,
            width,
            height,
            scale_factor: 1.0,
            renderer: QuadRenderer::default(),
            batch: QuadBatch::new(),
            runs: Vec::new(),
            current: None,
            clear_color: None,
            warned_non_parallel: false,
            warned_gradient: false,
            warned_shape: false,
        }
    }

    /// Allocates a texture on this backend's device.
    pub fn create_texture(&self, desc: crate::texture::TextureDesc) -> anyhow::Result<WgpuTexture> {
        WgpuTexture::create(&self.device, &self.queue, desc)
    }

    /// The render-target bounds a context should be constructed against.
    pub fn target(&self) -> SurfaceTarget {
        SurfaceTarget::new(self.width, self.height)
    }

    /// Updates the target bounds after a resize. Only affects contexts
    /// created afterwards.
    pub fn set_target_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Device pixels per logical pixel, applied to scissor conversion.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Encodes every batched run into `encoder`, targeting `view`, and resets
    /// per-frame state. Call once per pass after the context is dropped.
    pub fn flush(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        self.close_run();
        let clear = self.clear_color.take();

        if !self.runs.is_empty() || clear.is_some() {
            self.renderer.render(
                &self.device,
                &self.queue,
                encoder,
                view,
                self.target_format,
                (self.width, self.height),
                self.scale_factor,
                &self.batch,
                &self.runs,
                clear,
            );
        }

        self.batch.clear();
        self.runs.clear();
    }

    fn begin_run(&mut self, kind: RunKind, texture: Option<WgpuTexture>, xform: Affine3, state: &RenderState) {
        let key = RunKey {
            kind,
            texture: texture
                .as_ref()
                .map(|t| (t.storage_id(), t.address_mode(), t.linear_filtering())),
            xform,
            composite: state.composite_mode(),
            clip: state.final_clip(),
        };

        if let Some(open) = &self.current {
            if open.key == key {
                return;
            }
        }

        self.close_run();
        self.current = Some(OpenRun {
            key,
            texture,
            quad_start: self.batch.quad_count(),
        });
    }

    fn close_run(&mut self) {
        if let Some(open) = self.current.take() {
            let end = self.batch.quad_count();
            if end > open.quad_start {
                self.runs.push(DrawRun {
                    kind: open.key.kind,
                    texture: open.texture,
                    xform: open.key.xform,
                    composite: open.key.composite,
                    clip: open.key.clip,
                    quads: open.quad_start..end,
                });
            }
        }
    }

    /// The quad pipeline projects through the parallel camera; a perspective
    /// camera falls back to it.
    fn note_camera(&mut self, state: &RenderState) {
        if !state.camera().is_parallel() && !self.warned_non_parallel {
            log::debug!("perspective camera requested; quad backend projects with the parallel camera");
            self.warned_non_parallel = true;
        }
    }

    /// Flat color the quad pipeline composites with. Gradient paints fall
    /// back to their first stop until the gradient pipeline exists.
    fn resolve_paint_color(&mut self, state: &RenderState) -> Color {
        let base = match state.paint() {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => {
                if !self.warned_gradient {
                    log::debug!("gradient paint approximated by its first stop in the quad backend");
                    self.warned_gradient = true;
                }
                g.stops.first().map_or(Color::TRANSPARENT, |s| s.color)
            }
            Paint::RadialGradient(g) => {
                if !self.warned_gradient {
                    log::debug!("gradient paint approximated by its first stop in the quad backend");
                    self.warned_gradient = true;
                }
                g.stops.first().map_or(Color::TRANSPARENT, |s| s.color)
            }
        };
        base.mul_alpha(state.extra_alpha())
    }
}

impl RenderBackend for WgpuBackend {
    type Texture = WgpuTexture;
    type Batch = QuadBatch;

    fn validate_paint_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        mask: Option<&WgpuTexture>,
        _bx: f32,
        _by: f32,
        _bw: f32,
        _bh: f32,
    ) {
        self.note_camera(state);
        let color = self.resolve_paint_color(state);
        let (kind, texture) = match mask {
            Some(t) => (RunKind::Mask, Some(t.clone())),
            None => (RunKind::Color, None),
        };
        self.begin_run(kind, texture, *xform, state);
        self.batch.set_color(color.to_array());
    }

    fn validate_texture_op(
        &mut self,
        state: &RenderState,
        xform: &Affine3,
        texture: &WgpuTexture,
        _format: PixelFormat,
    ) {
        self.note_camera(state);
        self.begin_run(RunKind::Textured, Some(texture.clone()), *xform, state);
        self.batch
            .set_color(Color::WHITE.mul_alpha(state.extra_alpha()).to_array());
    }

    fn batch(&mut self) -> &mut QuadBatch {
        &mut self.batch
    }

    fn render_shape(
        &mut self,
        state: &RenderState,
        shape: &Shape,
        stroke: Option<&Stroke>,
        _bounds: Rect,
    ) {
        let Shape::Rect(rect) = shape else {
            if !self.warned_shape {
                log::debug!("only rectangles render through the quad backend; shape ignored");
                self.warned_shape = true;
            }
            return;
        };

        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }

        self.note_camera(state);
        let st = state.simple_translate();
        let xform = if st.active { Affine3::IDENTITY } else { state.transform() };
        let rect = if st.active { rect.offset(st.tx, st.ty) } else { rect };

        let color = self.resolve_paint_color(state);
        self.begin_run(RunKind::Color, None, xform, state);
        self.batch.set_color(color.to_array());

        match stroke {
            None => {
                let (x1, y1) = (rect.min().x, rect.min().y);
                let (x2, y2) = (rect.max().x, rect.max().y);
                self.batch.add_quad(x1, y1, x2, y2, 0.0, 0.0, 0.0, 0.0);
            }
            Some(s) => {
                let half = (s.width * 0.5).max(0.0);
                let outer = Rect::new(
                    rect.min().x - half,
                    rect.min().y - half,
                    rect.width() + 2.0 * half,
                    rect.height() + 2.0 * half,
                );
                let inner = Rect::new(
                    rect.min().x + half,
                    rect.min().y + half,
                    rect.width() - 2.0 * half,
                    rect.height() - 2.0 * half,
                );
                if inner.is_empty() {
                    // Stroke covers the whole rectangle.
                    let (x1, y1) = (outer.min().x, outer.min().y);
                    let (x2, y2) = (outer.max().x, outer.max().y);
                    self.batch.add_quad(x1, y1, x2, y2, 0.0, 0.0, 0.0, 0.0);
                } else {
                    let (ox1, oy1) = (outer.min().x, outer.min().y);
                    let (ox2, oy2) = (outer.max().x, outer.max().y);
                    let (ix1, iy1) = (inner.min().x, inner.min().y);
                    let (ix2, iy2) = (inner.max().x, inner.max().y);
                    // Four edge bands with square corners.
                    self.batch.add_quad(ox1, oy1, ox2, iy1, 0.0, 0.0, 0.0, 0.0);
                    self.batch.add_quad(ox1, iy2, ox2, oy2, 0.0, 0.0, 0.0, 0.0);
                    self.batch.add_quad(ox1, iy1, ix1, iy2, 0.0, 0.0, 0.0, 0.0);
                    self.batch.add_quad(ix2, iy1, ox2, iy2, 0.0, 0.0, 0.0, 0.0);
                }
            }
        }
    }

    fn clear(&mut self, color: Color) {
        // Batched geometry predating the clear would be wiped anyway; drop it
        // instead of encoding it.
        self.close_run();
        self.runs.clear();
        self.batch.clear();
        self.clear_color = Some(color);
    }
}
