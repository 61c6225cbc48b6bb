//! wgpu backend for the graphics context.
//!
//! Validate-ops arriving from a [`Graphics`](crate::graphics::Graphics)
//! context are folded into keyed draw runs; a flush encodes one render pass
//! replaying every run against the quad pipeline. Each backend instance owns
//! its GPU resources (pipelines, buffers, bind groups).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod quads;
mod texture;

pub use ctx::WgpuBackend;
pub use texture::WgpuTexture;
