//! Texture resources: immutable-geometry, mutable-content pixel buffers with
//! wrap-mode view sharing and validated partial upload.
//!
//! The [`Texture`] trait is the contract the graphics context draws against;
//! each backend supplies a concrete implementation over its own storage
//! ([`CpuTexture`] here, the wgpu texture in `render`). Shared behavior —
//! metadata accessors, the wrap-mode share relation, upload validation, the
//! image convenience forms — lives in [`TextureDesc`], free functions, and
//! default trait methods rather than in the implementations.

mod cpu;
mod disposal;
mod format;
mod update;
mod wrap;

pub use cpu::CpuTexture;
pub use disposal::DisposalRecord;
pub use format::PixelFormat;
pub use update::{TextureUpdate, UpdateError, check_update_params};
pub use wrap::WrapMode;

use crate::image::Image;

/// Immutable texture metadata, fixed at allocation.
///
/// `physical_*` is the full backing allocation; the content rect is the
/// caller-usable sub-region (physical may be padded for alignment or
/// power-of-two constraints). Texture coordinates are always derived from
/// physical dimensions with the content origin folded in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub format: PixelFormat,
    pub wrap_mode: WrapMode,
    pub physical_width: u32,
    pub physical_height: u32,
    pub content_x: u32,
    pub content_y: u32,
    pub content_width: u32,
    pub content_height: u32,
}

impl TextureDesc {
    /// Descriptor for an unpadded texture (content covers the allocation).
    pub fn simple(format: PixelFormat, wrap_mode: WrapMode, width: u32, height: u32) -> Self {
        Self {
            format,
            wrap_mode,
            physical_width: width,
            physical_height: height,
            content_x: 0,
            content_y: 0,
            content_width: width,
            content_height: height,
        }
    }

    /// The same geometry viewed under a different wrap mode.
    #[inline]
    pub fn with_wrap_mode(self, wrap_mode: WrapMode) -> Self {
        Self { wrap_mode, ..self }
    }

    /// Normalized texture coordinate for a pixel-space source coordinate,
    /// relative to the physical allocation with the content origin applied.
    #[inline]
    pub fn uv(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (self.content_x as f32 + sx) / self.physical_width as f32,
            (self.content_y as f32 + sy) / self.physical_height as f32,
        )
    }
}

/// GPU- or CPU-backed pixel resource drawn by the graphics context.
///
/// Geometry and format are immutable after allocation; content changes only
/// through [`update`](Texture::update). `linear_filtering` and
/// `last_image_serial` are per-view mutable state and start at their defaults
/// on every newly shared view.
pub trait Texture {
    /// Immutable metadata for this view.
    fn desc(&self) -> &TextureDesc;

    fn linear_filtering(&self) -> bool;
    fn set_linear_filtering(&mut self, linear: bool);

    /// Version stamp of the last image uploaded into this view, used by
    /// callers to detect stale cached content. Monotonicity is the caller's
    /// convention; this layer only stores the value.
    fn last_image_serial(&self) -> u64;
    fn set_last_image_serial(&mut self, serial: u64);

    /// Returns a view of this texture under `alt_mode`.
    ///
    /// - `alt_mode` equal to the current mode: a handle to the same storage
    ///   (no new backing allocation).
    /// - `Repeat`/`ClampToEdge` in either direction: a new shared view over
    ///   the same storage reporting `alt_mode`, with per-view mutable state
    ///   reset to defaults.
    /// - Anything else: `None`. Callers must treat this as "allocate a fresh,
    ///   non-shared texture", not as an error.
    fn shared_texture(&self, alt_mode: WrapMode) -> Option<Self>
    where
        Self: Sized;

    /// Copies a sub-rectangle of source pixels into the content region.
    ///
    /// All validation happens before any backend call; on error the texture
    /// content is untouched.
    fn update(&mut self, update: &TextureUpdate<'_>) -> Result<(), UpdateError>;

    /// Uploads a whole image at the content origin.
    fn update_image(&mut self, img: &Image) -> Result<(), UpdateError> {
        self.update_image_at(img, 0, 0)
    }

    /// Uploads a whole image at `(dst_x, dst_y)`.
    fn update_image_at(&mut self, img: &Image, dst_x: i32, dst_y: i32) -> Result<(), UpdateError> {
        self.update_image_region(img, dst_x, dst_y, img.width() as i32, img.height() as i32, false)
    }

    /// Uploads the top-left `src_w × src_h` region of an image, reducing to
    /// the fully-parameterized form using the image's own metadata.
    fn update_image_region(
        &mut self,
        img: &Image,
        dst_x: i32,
        dst_y: i32,
        src_w: i32,
        src_h: i32,
        skip_flush: bool,
    ) -> Result<(), UpdateError> {
        self.update(&TextureUpdate {
            pixels: img.pixels(),
            format: img.format(),
            dst_x,
            dst_y,
            src_x: img.min_x() as i32,
            src_y: img.min_y() as i32,
            src_w,
            src_h,
            scan: img.scanline_stride() as i32,
            skip_flush,
        })
    }
}

/// Shared-view dispatch used by `shared_texture` implementations.
///
/// Distinguishes the identity case (same mode: hand back the same storage)
/// from the shared-view case (the `Repeat`/`ClampToEdge` relation) and the
/// unavailable case (caller allocates fresh).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShareDisposition {
    Identity,
    NewView,
    Unavailable,
}

/// Classifies a wrap-mode share request.
#[inline]
pub fn classify_share(current: WrapMode, alt: WrapMode) -> ShareDisposition {
    if current == alt {
        ShareDisposition::Identity
    } else if current.shareable_with(alt) {
        ShareDisposition::NewView
    } else {
        ShareDisposition::Unavailable
    }
}
