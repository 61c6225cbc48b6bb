//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for headless rendering
//! - providing device/queue access to texture allocation and the quad renderer

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
