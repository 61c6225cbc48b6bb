use crate::coords::{CornerRadii, Rect, Vec2};

/// Geometry accepted by the fill/draw protocol.
///
/// Backends tessellate or rasterize these however suits them; the context
/// only needs [`bounds`](Shape::bounds) for proportional-paint resolution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    RoundedRect(Rect, CornerRadii),
    /// Ellipse inscribed in the given rectangle.
    Ellipse(Rect),
    Line(Vec2, Vec2),
}

impl Shape {
    /// Tight axis-aligned bounding box (stroke width not included).
    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Rect(r) | Shape::RoundedRect(r, _) | Shape::Ellipse(r) => r.normalized(),
            Shape::Line(a, b) => Rect::from_points(a, b),
        }
    }
}
