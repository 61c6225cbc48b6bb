use crate::coords::Vec2;

use super::Color;

/// Gradient spread behavior outside the [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1] in typical usage, but is not strictly enforced.
/// Backends may clamp/sort stops at build time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition.
///
/// Semantics:
/// - With `proportional = false`, `start` and `end` are positions in the same
///   coordinate space as geometry.
/// - With `proportional = true`, `start` and `end` are fractions of the
///   bounding box of the shape being painted; the context resolves them
///   against concrete bounds at draw time.
/// - Stops define premultiplied linear colors.
/// - `spread` defines out-of-range behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub proportional: bool,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            start,
            end,
            stops,
            spread,
            proportional: false,
        }
    }

    /// Marks the gradient axis as relative to the painted shape's bounds.
    #[inline]
    pub fn proportional(mut self) -> Self {
        self.proportional = true;
        self
    }

    /// Returns true when the gradient definition is structurally usable.
    ///
    /// Backends may still impose additional constraints (minimum number of
    /// stops, sorting, etc.).
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Radial gradient definition.
///
/// `center` and `radius` follow the same proportional convention as
/// [`LinearGradient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub proportional: bool,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self {
            center,
            radius,
            stops,
            spread,
            proportional: false,
        }
    }

    /// Marks the gradient geometry as relative to the painted shape's bounds.
    #[inline]
    pub fn proportional(mut self) -> Self {
        self.proportional = true;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
    }
}
