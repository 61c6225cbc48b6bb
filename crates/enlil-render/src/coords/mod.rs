//! Coordinate and geometry types shared across the rendering core.
//!
//! Canonical CPU space:
//! - Device-independent pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Backends convert to NDC in shaders using a viewport uniform.

mod corner_radii;
mod rect;
mod transform;
mod vec2;

pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use transform::Affine3;
pub use vec2::Vec2;
