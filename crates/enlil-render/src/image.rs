use crate::texture::PixelFormat;

/// CPU-side pixel image, the source type for convenience texture updates.
///
/// The pixel buffer addresses a `width × height` region whose first pixel sits
/// at `(min_x, min_y)` within the buffer's row grid; `scanline_stride` is the
/// row pitch in bytes and may exceed the tightly packed width.
#[derive(Debug, Clone)]
pub struct Image {
    format: PixelFormat,
    width: u32,
    height: u32,
    min_x: u32,
    min_y: u32,
    scanline_stride: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Tightly packed image with its content at the buffer origin.
    pub fn new(format: PixelFormat, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            format,
            width,
            height,
            min_x: 0,
            min_y: 0,
            scanline_stride: width * format.bytes_per_pixel() as u32,
            pixels,
        }
    }

    /// Image viewing a sub-region of a larger pixel grid.
    pub fn with_region(
        format: PixelFormat,
        width: u32,
        height: u32,
        min_x: u32,
        min_y: u32,
        scanline_stride: u32,
        pixels: Vec<u8>,
    ) -> Self {
        Self {
            format,
            width,
            height,
            min_x,
            min_y,
            scanline_stride,
            pixels,
        }
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn min_x(&self) -> u32 {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> u32 {
        self.min_y
    }

    /// Row pitch in bytes.
    #[inline]
    pub fn scanline_stride(&self) -> u32 {
        self.scanline_stride
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
