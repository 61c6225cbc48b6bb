//! Paint model shared between the graphics context and backends.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - paint sources (solid, gradients)
//! - stroke style
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;
pub mod stroke;

pub use color::Color;
pub use gradient::{ColorStop, LinearGradient, RadialGradient, SpreadMode};
pub use stroke::{Stroke, StrokeCap, StrokeJoin};

/// Paint source for filling geometry.
///
/// Extend by adding variants (e.g. `ImagePattern`) while keeping the enum
/// stable for backend dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// True when the paint is a flat color, the precondition (together with a
    /// translate-only transform) for the context's simple-translate fast path.
    #[inline]
    pub fn is_flat_color(&self) -> bool {
        matches!(self, Paint::Solid(_))
    }

    /// True when the paint's coordinates are relative to the bounding box of
    /// the shape being painted and must be resolved at draw time.
    #[inline]
    pub fn is_proportional(&self) -> bool {
        match self {
            Paint::Solid(_) => false,
            Paint::LinearGradient(g) => g.proportional,
            Paint::RadialGradient(g) => g.proportional,
        }
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0 && c.r <= 1.0 && c.g <= 1.0 && c.b <= 1.0,
            // Conservative: treat gradients as potentially translucent unless
            // every stop is opaque.
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
        }
    }
}

impl Default for Paint {
    /// Contexts start with an opaque white fill.
    #[inline]
    fn default() -> Self {
        Paint::Solid(Color::WHITE)
    }
}
