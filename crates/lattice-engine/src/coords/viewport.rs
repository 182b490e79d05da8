/// Drawable size in physical pixels.
///
/// Shaders use it to turn pixel sizes into NDC extents.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    /// Size clamped to at least one pixel per axis, as uploaded to shaders.
    #[inline]
    pub fn to_uniform(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
