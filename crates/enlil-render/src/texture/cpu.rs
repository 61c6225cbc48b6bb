use std::sync::{Arc, Mutex};

use super::{
    DisposalRecord, ShareDisposition, Texture, TextureDesc, TextureUpdate, UpdateError, WrapMode,
    check_update_params, classify_share,
};

/// Software-backed texture over heap pixel storage.
///
/// Storage covers the full physical allocation and is shared between wrap-mode
/// views; uploads copy row by row into the content region, honoring the source
/// stride and the content origin. Backends without GPU storage (and this
/// crate's tests) use it as the reference implementation of the texture
/// contract.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    desc: TextureDesc,
    pixels: Arc<Mutex<Vec<u8>>>,
    disposal: DisposalRecord,
    linear_filtering: bool,
    last_image_serial: u64,
}

impl CpuTexture {
    /// Allocates zeroed storage for `desc` with no teardown work.
    pub fn new(desc: TextureDesc) -> Self {
        Self::with_disposal(desc, DisposalRecord::noop())
    }

    /// Allocates zeroed storage, registering `disposal` to fire when the last
    /// view over this storage is released.
    pub fn with_disposal(desc: TextureDesc, disposal: DisposalRecord) -> Self {
        debug_assert!(
            desc.content_x + desc.content_width <= desc.physical_width
                && desc.content_y + desc.content_height <= desc.physical_height,
            "content region must fit within the physical allocation"
        );
        let size = desc.physical_width as usize
            * desc.physical_height as usize
            * desc.format.bytes_per_pixel() as usize;
        Self {
            desc,
            pixels: Arc::new(Mutex::new(vec![0u8; size])),
            disposal,
            linear_filtering: true,
            last_image_serial: 0,
        }
    }

    /// True when both handles view the same backing storage.
    #[inline]
    pub fn shares_storage_with(&self, other: &CpuTexture) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Copy of the full physical pixel buffer, for inspection.
    pub fn snapshot(&self) -> Vec<u8> {
        self.pixels.lock().expect("texture storage poisoned").clone()
    }

    /// Row pitch of the physical allocation in bytes.
    #[inline]
    fn physical_stride(&self) -> usize {
        self.desc.physical_width as usize * self.desc.format.bytes_per_pixel() as usize
    }
}

impl Texture for CpuTexture {
    fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    fn linear_filtering(&self) -> bool {
        self.linear_filtering
    }

    fn set_linear_filtering(&mut self, linear: bool) {
        self.linear_filtering = linear;
    }

    fn last_image_serial(&self) -> u64 {
        self.last_image_serial
    }

    fn set_last_image_serial(&mut self, serial: u64) {
        self.last_image_serial = serial;
    }

    fn shared_texture(&self, alt_mode: WrapMode) -> Option<Self> {
        match classify_share(self.desc.wrap_mode, alt_mode) {
            ShareDisposition::Identity => Some(self.clone()),
            ShareDisposition::NewView => Some(Self {
                desc: self.desc.with_wrap_mode(alt_mode),
                pixels: Arc::clone(&self.pixels),
                disposal: self.disposal.clone(),
                linear_filtering: true,
                last_image_serial: 0,
            }),
            ShareDisposition::Unavailable => None,
        }
    }

    fn update(&mut self, u: &TextureUpdate<'_>) -> Result<(), UpdateError> {
        check_update_params(&self.desc, u)?;

        let bpp = self.desc.format.bytes_per_pixel() as usize;
        let row_bytes = u.src_w as usize * bpp;
        let src_stride = u.scan as usize;
        let dst_stride = self.physical_stride();

        let mut pixels = self.pixels.lock().expect("texture storage poisoned");
        for row in 0..u.src_h as usize {
            let src_off = (u.src_y as usize + row) * src_stride + u.src_x as usize * bpp;
            let dst_row = self.desc.content_y as usize + u.dst_y as usize + row;
            let dst_col = self.desc.content_x as usize + u.dst_x as usize;
            let dst_off = dst_row * dst_stride + dst_col * bpp;
            pixels[dst_off..dst_off + row_bytes]
                .copy_from_slice(&u.pixels[src_off..src_off + row_bytes]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::texture::PixelFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn desc(w: u32, h: u32) -> TextureDesc {
        TextureDesc::simple(PixelFormat::ByteBgraPre, WrapMode::ClampToEdge, w, h)
    }

    fn gray_update<'a>(pixels: &'a [u8], w: i32, h: i32, scan: i32) -> TextureUpdate<'a> {
        TextureUpdate {
            pixels,
            format: PixelFormat::ByteGray,
            dst_x: 0,
            dst_y: 0,
            src_x: 0,
            src_y: 0,
            src_w: w,
            src_h: h,
            scan,
            skip_flush: false,
        }
    }

    // ── upload ────────────────────────────────────────────────────────────

    #[test]
    fn full_upload_round_trips() {
        let mut tex = CpuTexture::new(desc(64, 64));
        let src: Vec<u8> = (0..64 * 64 * 4).map(|i| (i % 251) as u8).collect();
        tex.update(&TextureUpdate {
            pixels: &src,
            format: PixelFormat::ByteBgraPre,
            dst_x: 0,
            dst_y: 0,
            src_x: 0,
            src_y: 0,
            src_w: 64,
            src_h: 64,
            scan: 64 * 4,
            skip_flush: false,
        })
        .unwrap();
        assert_eq!(tex.snapshot(), src);
    }

    #[test]
    fn sub_rect_upload_lands_at_destination() {
        let d = TextureDesc::simple(PixelFormat::ByteGray, WrapMode::ClampToEdge, 8, 8);
        let mut tex = CpuTexture::new(d);
        // 2×2 source block of 0xAA with stride 4.
        let src = [
            0xAA, 0xAA, 0x00, 0x00, //
            0xAA, 0xAA, 0x00, 0x00,
        ];
        let mut u = gray_update(&src, 2, 2, 4);
        u.dst_x = 3;
        u.dst_y = 5;
        tex.update(&u).unwrap();

        let out = tex.snapshot();
        for y in 0..8 {
            for x in 0..8 {
                let expected = if (3..5).contains(&x) && (5..7).contains(&y) { 0xAA } else { 0 };
                assert_eq!(out[y * 8 + x], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn upload_respects_content_origin_in_padded_storage() {
        let d = TextureDesc {
            format: PixelFormat::ByteGray,
            wrap_mode: WrapMode::ClampToEdge,
            physical_width: 8,
            physical_height: 8,
            content_x: 2,
            content_y: 1,
            content_width: 4,
            content_height: 4,
        };
        let mut tex = CpuTexture::new(d);
        let src = [0x11u8];
        tex.update(&gray_update(&src, 1, 1, 1)).unwrap();

        let out = tex.snapshot();
        // Content origin (0,0) maps to physical (2,1).
        assert_eq!(out[1 * 8 + 2], 0x11);
        assert_eq!(out.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn source_stride_larger_than_row_is_skipped() {
        let d = TextureDesc::simple(PixelFormat::ByteGray, WrapMode::ClampToEdge, 2, 2);
        let mut tex = CpuTexture::new(d);
        // Rows are 2 pixels wide inside an 8-byte stride; the padding bytes
        // (0xFF) must not leak into the texture.
        let src = [
            1, 2, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
            3, 4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        tex.update(&gray_update(&src, 2, 2, 8)).unwrap();
        assert_eq!(tex.snapshot(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn failed_update_leaves_content_untouched() {
        let mut tex = CpuTexture::new(desc(4, 4));
        let before = tex.snapshot();
        let src = vec![0xFFu8; 4 * 4 * 4];
        let err = tex
            .update(&TextureUpdate {
                pixels: &src,
                format: PixelFormat::ByteBgraPre,
                dst_x: 1, // 1 + 4 > 4: out of content bounds
                dst_y: 0,
                src_x: 0,
                src_y: 0,
                src_w: 4,
                src_h: 4,
                scan: 16,
                skip_flush: false,
            })
            .unwrap_err();
        assert!(matches!(err, UpdateError::RegionOutOfBounds { .. }));
        assert_eq!(tex.snapshot(), before);
    }

    // ── image convenience forms ───────────────────────────────────────────

    #[test]
    fn update_image_reduces_to_full_form() {
        let d = TextureDesc::simple(PixelFormat::ByteGray, WrapMode::ClampToEdge, 4, 4);
        let mut tex = CpuTexture::new(d);
        let img = Image::new(PixelFormat::ByteGray, 4, 4, (1..=16).collect());
        tex.update_image(&img).unwrap();
        assert_eq!(tex.snapshot(), (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn update_image_uses_min_corner_and_stride() {
        let d = TextureDesc::simple(PixelFormat::ByteGray, WrapMode::ClampToEdge, 2, 2);
        let mut tex = CpuTexture::new(d);
        // 2×2 content at (1,1) of a 4-wide grid.
        #[rustfmt::skip]
        let grid = vec![
            0, 0, 0, 0,
            0, 5, 6, 0,
            0, 7, 8, 0,
        ];
        let img = Image::with_region(PixelFormat::ByteGray, 2, 2, 1, 1, 4, grid);
        tex.update_image(&img).unwrap();
        assert_eq!(tex.snapshot(), vec![5, 6, 7, 8]);
    }

    // ── shared views ──────────────────────────────────────────────────────

    #[test]
    fn shared_view_same_mode_keeps_storage() {
        let tex = CpuTexture::new(desc(4, 4));
        let same = tex.shared_texture(WrapMode::ClampToEdge).unwrap();
        assert!(tex.shares_storage_with(&same));
        assert_eq!(same.desc().wrap_mode, WrapMode::ClampToEdge);
    }

    #[test]
    fn shared_view_repeat_over_clamp() {
        let mut tex = CpuTexture::new(desc(4, 4));
        tex.set_linear_filtering(false);
        tex.set_last_image_serial(7);

        let view = tex.shared_texture(WrapMode::Repeat).unwrap();
        assert!(tex.shares_storage_with(&view));
        assert_eq!(view.desc().wrap_mode, WrapMode::Repeat);
        assert_eq!(view.desc().physical_width, tex.desc().physical_width);
        assert_eq!(view.desc().content_width, tex.desc().content_width);
        // Per-view mutable state starts fresh on a new view.
        assert!(view.linear_filtering());
        assert_eq!(view.last_image_serial(), 0);
    }

    #[test]
    fn shared_view_clamp_over_repeat_is_symmetric() {
        let d = TextureDesc::simple(PixelFormat::ByteBgraPre, WrapMode::Repeat, 4, 4);
        let tex = CpuTexture::new(d);
        let view = tex.shared_texture(WrapMode::ClampToEdge).unwrap();
        assert!(tex.shares_storage_with(&view));
        assert_eq!(view.desc().wrap_mode, WrapMode::ClampToEdge);
    }

    #[test]
    fn shared_view_rejects_other_modes() {
        let tex = CpuTexture::new(desc(4, 4));
        assert!(tex.shared_texture(WrapMode::ClampToZero).is_none());
        assert!(tex.shared_texture(WrapMode::ClampNotNeeded).is_none());
    }

    #[test]
    fn view_sees_uploads_through_other_view() {
        let d = TextureDesc::simple(PixelFormat::ByteGray, WrapMode::ClampToEdge, 2, 1);
        let mut tex = CpuTexture::new(d);
        let view = tex.shared_texture(WrapMode::Repeat).unwrap();

        tex.update(&gray_update(&[9, 9], 2, 1, 2)).unwrap();
        assert_eq!(view.snapshot(), vec![9, 9]);
    }

    // ── disposal ──────────────────────────────────────────────────────────

    #[test]
    fn disposal_fires_after_last_view_drops() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let record = DisposalRecord::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let tex = CpuTexture::with_disposal(desc(4, 4), record);
        let view = tex.shared_texture(WrapMode::Repeat).unwrap();

        drop(tex);
        assert_eq!(fired.load(Ordering::SeqCst), 0, "view still holds storage");
        drop(view);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
