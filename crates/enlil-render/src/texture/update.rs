use thiserror::Error;

use super::{PixelFormat, TextureDesc};

/// Fully-parameterized texture upload request.
///
/// `pixels` addresses the caller's source image starting at its first byte;
/// `src_x`/`src_y` select a sub-rectangle within that image, `scan` is the
/// image's row stride in bytes. Offsets and sizes are signed so that sign
/// violations surface as validation errors rather than silent wraps.
#[derive(Debug, Copy, Clone)]
pub struct TextureUpdate<'a> {
    pub pixels: &'a [u8],
    pub format: PixelFormat,
    /// Destination offset within the texture's content region.
    pub dst_x: i32,
    pub dst_y: i32,
    /// Source offset within the caller's image.
    pub src_x: i32,
    pub src_y: i32,
    pub src_w: i32,
    pub src_h: i32,
    /// Source row stride in bytes.
    pub scan: i32,
    /// Hint that the backend may skip flushing batched vertex data before the
    /// upload. Ordering between uploads and in-flight sampling is the backend
    /// collaborator's contract.
    pub skip_flush: bool,
}

/// Precondition violation detected before any backend upload.
///
/// Always fatal to the single `update` call that produced it; the caller
/// decides whether to abandon the frame or skip the texture.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UpdateError {
    #[error("{0:?} requires a multi-texture upload path")]
    MultiPlaneUnsupported(PixelFormat),

    #[error("pixel buffer must be non-empty")]
    EmptySource,

    #[error("source format ({src:?}) must match texture format ({dst:?})")]
    FormatMismatch { src: PixelFormat, dst: PixelFormat },

    #[error("dst_x ({dst_x}) and dst_y ({dst_y}) must be >= 0")]
    NegativeDestination { dst_x: i32, dst_y: i32 },

    #[error("src_x ({src_x}) and src_y ({src_y}) must be >= 0")]
    NegativeSource { src_x: i32, src_y: i32 },

    #[error("src_w ({src_w}) and src_h ({src_h}) must be > 0")]
    EmptyRegion { src_w: i32, src_h: i32 },

    #[error("scan ({scan}) must be a multiple of the pixel stride ({bytes_per_pixel})")]
    MisalignedStride { scan: i32, bytes_per_pixel: i32 },

    #[error("src_w ({src_w}) must be <= scan/bytes_per_pixel ({row_capacity})")]
    WidthExceedsStride { src_w: i32, row_capacity: i32 },

    #[error(
        "destination region (x={dst_x}, y={dst_y}, w={src_w}, h={src_h}) must fit \
         within texture content bounds (content_width={content_width}, \
         content_height={content_height})"
    )]
    RegionOutOfBounds {
        dst_x: i32,
        dst_y: i32,
        src_w: i32,
        src_h: i32,
        content_width: i32,
        content_height: i32,
    },

    #[error("upload requires {needed} bytes, but only {available} bytes are available")]
    SourceTooSmall { needed: usize, available: usize },
}

/// Validates an upload request against a texture's metadata.
///
/// Checks run in a fixed order and fail fast on the first violation, so later
/// checks may rely on earlier ones (stride arithmetic assumes the stride is a
/// positive pixel multiple, the byte count assumes in-range offsets).
pub fn check_update_params(desc: &TextureDesc, u: &TextureUpdate<'_>) -> Result<(), UpdateError> {
    if desc.format.is_multi_plane() {
        return Err(UpdateError::MultiPlaneUnsupported(desc.format));
    }
    if u.pixels.is_empty() {
        return Err(UpdateError::EmptySource);
    }
    if u.format != desc.format {
        return Err(UpdateError::FormatMismatch {
            src: u.format,
            dst: desc.format,
        });
    }
    if u.dst_x < 0 || u.dst_y < 0 {
        return Err(UpdateError::NegativeDestination {
            dst_x: u.dst_x,
            dst_y: u.dst_y,
        });
    }
    if u.src_x < 0 || u.src_y < 0 {
        return Err(UpdateError::NegativeSource {
            src_x: u.src_x,
            src_y: u.src_y,
        });
    }
    if u.src_w <= 0 || u.src_h <= 0 {
        return Err(UpdateError::EmptyRegion {
            src_w: u.src_w,
            src_h: u.src_h,
        });
    }
    let bytes_per_pixel = desc.format.bytes_per_pixel();
    if u.scan <= 0 || u.scan % bytes_per_pixel != 0 {
        return Err(UpdateError::MisalignedStride {
            scan: u.scan,
            bytes_per_pixel,
        });
    }
    let row_capacity = u.scan / bytes_per_pixel;
    if u.src_w > row_capacity {
        return Err(UpdateError::WidthExceedsStride {
            src_w: u.src_w,
            row_capacity,
        });
    }
    let content_width = desc.content_width as i32;
    let content_height = desc.content_height as i32;
    if u.dst_x + u.src_w > content_width || u.dst_y + u.src_h > content_height {
        return Err(UpdateError::RegionOutOfBounds {
            dst_x: u.dst_x,
            dst_y: u.dst_y,
            src_w: u.src_w,
            src_h: u.src_h,
            content_width,
            content_height,
        });
    }
    // Last source row only needs `src_w` pixels, not a full stride; every
    // preceding row (and the sub-rect offset) consumes whole strides.
    let needed = (u.src_x as usize) * (bytes_per_pixel as usize)
        + (u.src_y as usize) * (u.scan as usize)
        + ((u.src_h - 1) as usize) * (u.scan as usize)
        + (u.src_w as usize) * (bytes_per_pixel as usize);
    if needed > u.pixels.len() {
        return Err(UpdateError::SourceTooSmall {
            needed,
            available: u.pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::WrapMode;

    fn desc_64() -> TextureDesc {
        TextureDesc {
            format: PixelFormat::ByteBgraPre,
            wrap_mode: WrapMode::ClampToEdge,
            physical_width: 64,
            physical_height: 64,
            content_x: 0,
            content_y: 0,
            content_width: 64,
            content_height: 64,
        }
    }

    fn full_update(pixels: &[u8]) -> TextureUpdate<'_> {
        TextureUpdate {
            pixels,
            format: PixelFormat::ByteBgraPre,
            dst_x: 0,
            dst_y: 0,
            src_x: 0,
            src_y: 0,
            src_w: 64,
            src_h: 64,
            scan: 64 * 4,
            skip_flush: false,
        }
    }

    // ── happy path ────────────────────────────────────────────────────────

    #[test]
    fn exact_fit_buffer_passes() {
        let pixels = vec![0u8; 64 * 64 * 4];
        assert_eq!(check_update_params(&desc_64(), &full_update(&pixels)), Ok(()));
    }

    #[test]
    fn exact_fit_needs_every_byte() {
        // One byte short of the exact requirement must fail: the computed
        // requirement lands precisely on the buffer's capacity boundary.
        let pixels = vec![0u8; 64 * 64 * 4 - 1];
        assert_eq!(
            check_update_params(&desc_64(), &full_update(&pixels)),
            Err(UpdateError::SourceTooSmall {
                needed: 64 * 64 * 4,
                available: 64 * 64 * 4 - 1,
            })
        );
    }

    #[test]
    fn last_row_only_needs_src_w_pixels() {
        // 2 rows of a 3-pixel-wide gray sub-rect with an 8-byte stride:
        // row 0 consumes a full stride, row 1 only 3 bytes.
        let desc = TextureDesc {
            format: PixelFormat::ByteGray,
            ..desc_64()
        };
        let pixels = vec![0u8; 8 + 3];
        let u = TextureUpdate {
            format: PixelFormat::ByteGray,
            src_w: 3,
            src_h: 2,
            scan: 8,
            ..full_update(&pixels)
        };
        assert_eq!(check_update_params(&desc, &u), Ok(()));
    }

    // ── individual violations ─────────────────────────────────────────────

    #[test]
    fn multi_plane_format_rejected_first() {
        let desc = TextureDesc {
            format: PixelFormat::MultiYCbCr420,
            ..desc_64()
        };
        // Everything else about this request is broken too; the multi-plane
        // rejection must still win.
        let u = TextureUpdate {
            pixels: &[],
            format: PixelFormat::ByteGray,
            dst_x: -1,
            ..full_update(&[])
        };
        assert_eq!(
            check_update_params(&desc, &u),
            Err(UpdateError::MultiPlaneUnsupported(PixelFormat::MultiYCbCr420))
        );
    }

    #[test]
    fn empty_buffer_rejected() {
        let u = full_update(&[]);
        assert_eq!(check_update_params(&desc_64(), &u), Err(UpdateError::EmptySource));
    }

    #[test]
    fn format_mismatch_rejected() {
        let pixels = vec![0u8; 16];
        let u = TextureUpdate {
            format: PixelFormat::ByteGray,
            ..full_update(&pixels)
        };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::FormatMismatch {
                src: PixelFormat::ByteGray,
                dst: PixelFormat::ByteBgraPre,
            })
        );
    }

    #[test]
    fn negative_destination_rejected() {
        let pixels = vec![0u8; 16];
        let u = TextureUpdate { dst_y: -3, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::NegativeDestination { dst_x: 0, dst_y: -3 })
        );
    }

    #[test]
    fn negative_source_rejected() {
        let pixels = vec![0u8; 16];
        let u = TextureUpdate { src_x: -1, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::NegativeSource { src_x: -1, src_y: 0 })
        );
    }

    #[test]
    fn zero_size_region_rejected() {
        let pixels = vec![0u8; 16];
        let u = TextureUpdate { src_w: 0, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::EmptyRegion { src_w: 0, src_h: 64 })
        );
    }

    #[test]
    fn misaligned_stride_rejected() {
        let pixels = vec![0u8; 1024];
        let u = TextureUpdate { scan: 63, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::MisalignedStride { scan: 63, bytes_per_pixel: 4 })
        );
    }

    #[test]
    fn stride_checked_before_row_capacity() {
        // A stride that is both misaligned and too small must report the
        // alignment violation: the row-capacity division is only meaningful
        // once the stride is known to be a pixel multiple.
        let pixels = vec![0u8; 1024];
        let u = TextureUpdate { scan: 7, src_w: 64, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::MisalignedStride { scan: 7, bytes_per_pixel: 4 })
        );
    }

    #[test]
    fn width_exceeding_stride_rejected() {
        let pixels = vec![0u8; 1024];
        let u = TextureUpdate { scan: 32 * 4, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::WidthExceedsStride { src_w: 64, row_capacity: 32 })
        );
    }

    #[test]
    fn destination_outside_content_rejected() {
        let pixels = vec![0u8; 64 * 64 * 4];
        let u = TextureUpdate { dst_x: 1, ..full_update(&pixels) };
        assert_eq!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::RegionOutOfBounds {
                dst_x: 1,
                dst_y: 0,
                src_w: 64,
                src_h: 64,
                content_width: 64,
                content_height: 64,
            })
        );
    }

    #[test]
    fn destination_checked_against_content_not_physical() {
        // Physical allocation is padded beyond the content region; the
        // destination check must use content bounds.
        let desc = TextureDesc {
            physical_width: 128,
            physical_height: 128,
            content_width: 64,
            content_height: 64,
            ..desc_64()
        };
        let pixels = vec![0u8; 128 * 128 * 4];
        let u = TextureUpdate {
            dst_x: 40,
            src_w: 30,
            src_h: 30,
            ..full_update(&pixels)
        };
        assert!(matches!(
            check_update_params(&desc, &u),
            Err(UpdateError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn source_offset_counts_against_buffer() {
        // src_y shifts the region deeper into the buffer; a buffer that fits
        // the region at (0,0) no longer fits at (0,8).
        let pixels = vec![0u8; 64 * 64 * 4];
        let u = TextureUpdate { src_y: 8, src_h: 64, src_w: 32, ..full_update(&pixels) };
        assert!(matches!(
            check_update_params(&desc_64(), &u),
            Err(UpdateError::SourceTooSmall { .. })
        ));
    }
}
