use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Result, bail};

use crate::texture::{
    DisposalRecord, PixelFormat, ShareDisposition, Texture, TextureDesc, TextureUpdate,
    UpdateError, WrapMode, check_update_params, classify_share,
};

/// Storage identity source for batching keys; shared views keep their source's
/// id so runs sampling the same pixels under the same sampler state batch
/// together.
static NEXT_STORAGE_ID: AtomicU64 = AtomicU64::new(1);

/// GPU texture resource over `wgpu` storage.
///
/// The `wgpu::Texture` handle is internally reference counted, so wrap-mode
/// views are plain handle clones; the disposal record destroys the backing
/// storage eagerly once the last view is released.
#[derive(Debug, Clone)]
pub struct WgpuTexture {
    desc: TextureDesc,
    storage_id: u64,
    raw: wgpu::Texture,
    view: wgpu::TextureView,
    queue: wgpu::Queue,
    disposal: DisposalRecord,
    linear_filtering: bool,
    last_image_serial: u64,
}

impl WgpuTexture {
    /// Allocates GPU storage for `desc`.
    ///
    /// Fails for formats the wgpu backend cannot express as a single
    /// sampleable texture (`ByteRgb`, `MultiYCbCr420`).
    pub fn create(device: &wgpu::Device, queue: &wgpu::Queue, desc: TextureDesc) -> Result<Self> {
        let format = map_format(desc.format)?;

        let raw = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("enlil texture"),
            size: wgpu::Extent3d {
                width: desc.physical_width,
                height: desc.physical_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = raw.create_view(&wgpu::TextureViewDescriptor::default());

        let storage = raw.clone();
        let disposal = DisposalRecord::new(move || {
            storage.destroy();
        });

        Ok(Self {
            desc,
            storage_id: NEXT_STORAGE_ID.fetch_add(1, Ordering::Relaxed),
            raw,
            view,
            queue: queue.clone(),
            disposal,
            linear_filtering: true,
            last_image_serial: 0,
        })
    }

    #[inline]
    pub fn storage_id(&self) -> u64 {
        self.storage_id
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Texture {
        &self.raw
    }

    /// Sampler address mode for this view's wrap behavior.
    ///
    /// `ClampToZero` needs border-color support to be exact; the quad backend
    /// approximates it with edge clamping.
    #[inline]
    pub fn address_mode(&self) -> wgpu::AddressMode {
        match self.desc.wrap_mode {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::ClampNotNeeded | WrapMode::ClampToZero | WrapMode::ClampToEdge => {
                wgpu::AddressMode::ClampToEdge
            }
        }
    }
}

impl Texture for WgpuTexture {
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
                storage_id: self.storage_id,
                raw: self.raw.clone(),
                view: self.view.clone(),
                queue: self.queue.clone(),
                disposal: self.disposal.clone(),
                linear_filtering: true,
                last_image_serial: 0,
            }),
            ShareDisposition::Unavailable => None,
        }
    }

    fn update(&mut self, u: &TextureUpdate<'_>) -> Result<(), UpdateError> {
        check_update_params(&self.desc, u)?;

        // `skip_flush` is advisory here: queue writes are ordered against the
        // next submission, which is the ordering contract the embedding
        // backend already relies on.
        let bpp = self.desc.format.bytes_per_pixel() as u32;
        let offset = (u.src_y as u64) * (u.scan as u64) + (u.src_x as u64) * (bpp as u64);

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.raw,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: self.desc.content_x + u.dst_x as u32,
                    y: self.desc.content_y + u.dst_y as u32,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            u.pixels,
            wgpu::TexelCopyBufferLayout {
                offset,
                bytes_per_row: Some(u.scan as u32),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: u.src_w as u32,
                height: u.src_h as u32,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }
}

/// Maps a core pixel format onto the wgpu texture format used for storage.
///
/// `IntArgbPre` relies on little-endian byte order matching `Bgra8Unorm`
/// lanes, the same packing the CPU compositor uses.
fn map_format(format: PixelFormat) -> Result<wgpu::TextureFormat> {
    Ok(match format {
        PixelFormat::ByteGray | PixelFormat::ByteAlpha => wgpu::TextureFormat::R8Unorm,
        PixelFormat::ByteBgraPre | PixelFormat::IntArgbPre => wgpu::TextureFormat::Bgra8Unorm,
        PixelFormat::FloatXyzw => wgpu::TextureFormat::Rgba32Float,
        PixelFormat::ByteRgb => {
            bail!("ByteRgb has no single-texture wgpu equivalent; convert to ByteBgraPre")
        }
        PixelFormat::MultiYCbCr420 => {
            bail!("MultiYCbCr420 requires a multi-texture path the quad backend does not provide")
        }
    })
}
