//! Fixed-shape primitives built on [`MeshBuffer`](super::MeshBuffer).
//!
//! Each shape owns one mesh buffer, fills it once at construction and draws
//! it through any [`DrawPass`](super::DrawPass).

pub mod grid;
pub mod point;
pub mod square;

pub use grid::Grid;
pub use point::Point;
pub use square::Square;
