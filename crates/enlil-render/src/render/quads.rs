use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::backend::{QuadBatch, QuadVertex};
use crate::coords::Rect;
use crate::graphics::CompositeMode;
use crate::paint::Color;

use super::ctx::{DrawRun, RunKind};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

/// Quad pipeline state and buffers.
///
/// Everything is created lazily against the first target format seen and
/// recreated if the format changes. Geometry is provided in logical pixels
/// and converted to NDC in the vertex shader using a viewport uniform.
#[derive(Default)]
pub(crate) struct QuadRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    shader: Option<wgpu::ShaderModule>,

    bgl_viewport: Option<wgpu::BindGroupLayout>,
    bgl_texture: Option<wgpu::BindGroupLayout>,
    pipelines: HashMap<(RunKind, CompositeMode), wgpu::RenderPipeline>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

impl QuadRenderer {
    /// Encodes one render pass covering `runs` over `batch`'s vertices.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        target_format: wgpu::TextureFormat,
        viewport: (u32, u32),
        scale_factor: f32,
        batch: &QuadBatch,
        runs: &[DrawRun],
        clear: Option<Color>,
    ) {
        self.ensure_base(device, target_format);
        for run in runs {
            self.ensure_pipeline(device, run.kind, run.composite);
        }

        self.write_viewport_uniform(queue, viewport);
        self.upload_geometry(device, queue, batch, runs);

        // Texture bind groups must outlive the pass; build them up front.
        let bind_groups: Vec<Option<wgpu::BindGroup>> = runs
            .iter()
            .map(|run| run.texture.as_ref().map(|t| self.texture_bind_group(device, t)))
            .collect();

        let load = match clear {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let Some(viewport_bind_group) = self.viewport_bind_group.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("enlil quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if runs.is_empty() {
            return; // clear-only pass
        }

        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else { return };

        rpass.set_bind_group(0, viewport_bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for (run, bind_group) in runs.iter().zip(&bind_groups) {
            let Some(pipeline) = self.pipelines.get(&(run.kind, run.composite)) else { continue };
            let Some((sx, sy, sw, sh)) = clip_to_scissor(run.clip, viewport, scale_factor) else {
                continue;
            };

            rpass.set_pipeline(pipeline);
            if let Some(bg) = bind_group {
                rpass.set_bind_group(1, bg, &[]);
            }
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(
                (run.quads.start * 6) as u32..(run.quads.end * 6) as u32,
                0,
                0..1,
            );
        }
    }

    fn ensure_base(&mut self, device: &wgpu::Device, target_format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(target_format) {
            return;
        }

        let shader_src = include_str!("shaders/quad.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("enlil quad shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bgl_viewport = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("enlil quad viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
                            .expect("ViewportUniform has non-zero size by construction"),
                    ),
                },
                count: None,
            }],
        });

        let bgl_texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("enlil quad texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enlil quad viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("enlil quad viewport bind group"),
            layout: &bgl_viewport,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.pipeline_format = Some(target_format);
        self.shader = Some(shader);
        self.bgl_viewport = Some(bgl_viewport);
        self.bgl_texture = Some(bgl_texture);
        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(viewport_bind_group);
        self.pipelines.clear();
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, kind: RunKind, composite: CompositeMode) {
        if self.pipelines.contains_key(&(kind, composite)) {
            return;
        }
        let (Some(shader), Some(bgl_viewport), Some(bgl_texture), Some(format)) = (
            self.shader.as_ref(),
            self.bgl_viewport.as_ref(),
            self.bgl_texture.as_ref(),
            self.pipeline_format,
        ) else {
            return;
        };

        let mut bind_group_layouts = vec![bgl_viewport];
        if kind != RunKind::Color {
            bind_group_layouts.push(bgl_texture);
        }

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("enlil quad pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let fs_entry = match kind {
            RunKind::Color => "fs_color",
            RunKind::Textured => "fs_textured",
            RunKind::Mask => "fs_mask",
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("enlil quad pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[quad_vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(composite_blend(composite)),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert((kind, composite), pipeline);
    }

    fn write_viewport_uniform(&mut self, queue: &wgpu::Queue, viewport: (u32, u32)) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [(viewport.0.max(1)) as f32, (viewport.1.max(1)) as f32],
            _pad: [0.0; 2],
        };
        queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Uploads vertex/index data, applying each run's transform on the CPU.
    ///
    /// Quads are emitted pre-transform; the parallel projection lets a 2D
    /// point map per vertex stand in for a matrix uniform.
    fn upload_geometry(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        batch: &QuadBatch,
        runs: &[DrawRun],
    ) {
        if batch.is_empty() {
            return;
        }

        let mut vertices: Vec<QuadVertex> = batch.vertices().to_vec();
        for run in runs {
            if run.xform.is_identity() {
                continue;
            }
            for v in &mut vertices[run.quads.start * 4..run.quads.end * 4] {
                let p = run
                    .xform
                    .transform_point(crate::coords::Vec2::new(v.pos[0], v.pos[1]));
                v.pos = [p.x, p.y];
            }
        }
        let indices = batch.build_indices();

        self.ensure_vbo_capacity(device, vertices.len());
        self.ensure_ibo_capacity(device, indices.len());

        if let Some(vbo) = self.vbo.as_ref() {
            queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
        }
        if let Some(ibo) = self.ibo.as_ref() {
            queue.write_buffer(ibo, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn ensure_vbo_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(256);
        self.vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enlil quad vbo"),
            size: (new_cap * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }

    fn ensure_ibo_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.ibo_capacity && self.ibo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(384);
        self.ibo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enlil quad ibo"),
            size: (new_cap * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.ibo_capacity = new_cap;
    }

    fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        texture: &super::texture::WgpuTexture,
    ) -> wgpu::BindGroup {
        let filter = if texture.linear_filtering() {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        };
        let address_mode = texture.address_mode();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("enlil quad sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("enlil quad texture bind group"),
            layout: self.bgl_texture.as_ref().expect("ensure_base ran first"),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }
}

fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

/// Blend state for a composite mode, assuming premultiplied colors.
fn composite_blend(composite: CompositeMode) -> wgpu::BlendState {
    let component = |src, dst| wgpu::BlendComponent {
        src_factor: src,
        dst_factor: dst,
        operation: wgpu::BlendOperation::Add,
    };
    use wgpu::BlendFactor::{One, OneMinusSrcAlpha, Zero};
    let (src, dst) = match composite {
        CompositeMode::Clear => (Zero, Zero),
        CompositeMode::Src => (One, Zero),
        CompositeMode::SrcOver => (One, OneMinusSrcAlpha),
        CompositeMode::Add => (One, One),
    };
    wgpu::BlendState {
        color: component(src, dst),
        alpha: component(src, dst),
    }
}

/// Converts a logical clip rect to physical scissor arguments.
///
/// Returns `None` for zero-area results (the draw run is skipped).
fn clip_to_scissor(clip: Rect, viewport: (u32, u32), scale: f32) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = ((viewport.0 as f32) * scale).max(1.0) as u32;
    let phys_vh = ((viewport.1 as f32) * scale).max(1.0) as u32;

    let r = clip.normalized();
    let x = ((r.min().x * scale).max(0.0) as u32).min(phys_vw);
    let y = ((r.min().y * scale).max(0.0) as u32).min(phys_vh);
    let x2 = ((r.max().x * scale).max(0.0) as u32).min(phys_vw);
    let y2 = ((r.max().y * scale).max(0.0) as u32).min(phys_vh);

    let w = x2.saturating_sub(x);
    let h = y2.saturating_sub(y);
    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}
