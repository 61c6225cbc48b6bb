/// Pixel layout of texture and image data.
///
/// The `*Pre` formats store premultiplied alpha, matching the paint model's
/// color representation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    /// 3 bytes per pixel, RGB order, no alpha.
    ByteRgb,
    /// 1 byte per pixel, single gray channel.
    ByteGray,
    /// 1 byte per pixel, coverage/alpha only. Draws sampling this format are
    /// routed through the paint pipeline as a mask.
    ByteAlpha,
    /// 4 bytes per pixel, BGRA order, premultiplied.
    ByteBgraPre,
    /// One packed 32-bit ARGB unit per pixel, premultiplied.
    IntArgbPre,
    /// 4 × f32 per pixel.
    FloatXyzw,
    /// Planar luma/chroma format. Uploads require a multi-texture path that
    /// this layer does not provide.
    MultiYCbCr420,
}

impl PixelFormat {
    /// Bytes per pixel unit in a tightly packed row.
    ///
    /// For the planar `MultiYCbCr420` format this reports the luma plane's
    /// unit; single-texture uploads reject the format before the value is
    /// ever used for addressing.
    #[inline]
    pub fn bytes_per_pixel(self) -> i32 {
        match self {
            PixelFormat::ByteRgb => 3,
            PixelFormat::ByteGray | PixelFormat::ByteAlpha | PixelFormat::MultiYCbCr420 => 1,
            PixelFormat::ByteBgraPre | PixelFormat::IntArgbPre => 4,
            PixelFormat::FloatXyzw => 16,
        }
    }

    /// True for single-channel coverage masks that composite through the
    /// active paint rather than as plain textured quads.
    #[inline]
    pub fn is_alpha_mask(self) -> bool {
        self == PixelFormat::ByteAlpha
    }

    /// True for planar formats whose pixels span multiple backing textures.
    #[inline]
    pub fn is_multi_plane(self) -> bool {
        self == PixelFormat::MultiYCbCr420
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        !matches!(self, PixelFormat::ByteRgb | PixelFormat::ByteGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_pixel_matches_layout() {
        assert_eq!(PixelFormat::ByteRgb.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::ByteGray.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::ByteAlpha.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::ByteBgraPre.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::IntArgbPre.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::FloatXyzw.bytes_per_pixel(), 16);
    }

    #[test]
    fn only_byte_alpha_is_mask() {
        assert!(PixelFormat::ByteAlpha.is_alpha_mask());
        assert!(!PixelFormat::ByteBgraPre.is_alpha_mask());
        assert!(!PixelFormat::ByteGray.is_alpha_mask());
    }

    #[test]
    fn only_ycbcr_is_multi_plane() {
        assert!(PixelFormat::MultiYCbCr420.is_multi_plane());
        assert!(!PixelFormat::IntArgbPre.is_multi_plane());
    }
}
