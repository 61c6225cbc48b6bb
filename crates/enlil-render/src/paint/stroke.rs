/// End-cap decoration applied to unclosed stroked paths.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StrokeCap {
    Butt,
    Round,
    Square,
}

/// Join decoration applied where stroked segments meet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StrokeJoin {
    Bevel,
    Miter,
    Round,
}

/// Stroke style applied by outline (`draw`) operations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    /// Ratio limit above which miter joins fall back to bevel.
    pub miter_limit: f32,
}

impl Stroke {
    #[inline]
    pub const fn new(width: f32, cap: StrokeCap, join: StrokeJoin, miter_limit: f32) -> Self {
        Self { width, cap, join, miter_limit }
    }
}

impl Default for Stroke {
    /// 1px square-capped miter stroke, the context's initial stroke state.
    #[inline]
    fn default() -> Self {
        Self::new(1.0, StrokeCap::Square, StrokeJoin::Miter, 10.0)
    }
}
