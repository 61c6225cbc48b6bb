/// Projection source for a render pass.
///
/// Contexts start with the parallel (orthographic) camera; scene layers with
/// 3D content may swap in a perspective projection for a subtree and restore
/// the default afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Camera {
    /// Orthographic projection matching the render target's pixel grid.
    Parallel,
    Perspective(PerspectiveCamera),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    #[inline]
    fn default() -> Self {
        Self { fov_y: 30.0, near: 0.1, far: 100.0 }
    }
}

impl Camera {
    #[inline]
    pub fn is_parallel(&self) -> bool {
        matches!(self, Camera::Parallel)
    }
}

impl Default for Camera {
    #[inline]
    fn default() -> Self {
        Camera::Parallel
    }
}
