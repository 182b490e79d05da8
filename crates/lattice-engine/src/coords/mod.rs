//! Coordinate types shared by the runtime and renderers.
//!
//! Geometry handed to the GPU is already in normalized device coordinates
//! ([-1, 1] on both axes, +Y up). Pixel-sized quantities (point sizes) are
//! converted to NDC in shaders using the physical [`Viewport`].

mod viewport;

pub use viewport::Viewport;
