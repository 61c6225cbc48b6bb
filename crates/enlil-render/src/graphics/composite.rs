/// Blend rule applied to subsequent draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CompositeMode {
    /// Destination is cleared, source ignored.
    Clear,
    /// Source replaces destination.
    Src,
    /// Source over destination (premultiplied). The initial mode.
    SrcOver,
    /// Source added to destination.
    Add,
}

impl Default for CompositeMode {
    #[inline]
    fn default() -> Self {
        CompositeMode::SrcOver
    }
}
