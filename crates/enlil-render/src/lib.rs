//! Enlil rendering core.
//!
//! This crate owns the low-level rendering pieces used by higher toolkit
//! layers: per-frame graphics state ([`graphics::Graphics`]), batched quad
//! emission against a backend seam ([`backend`]), and GPU texture resources
//! with validated upload and wrap-mode view sharing ([`texture`]).

pub mod backend;
pub mod coords;
pub mod device;
pub mod graphics;
pub mod image;
pub mod logging;
pub mod paint;
pub mod render;
pub mod texture;
