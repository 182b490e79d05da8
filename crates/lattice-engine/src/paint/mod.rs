//! Color model shared by the demo and renderers.

pub mod color;

pub use color::Color;
