//! Lattice engine crate.
//!
//! Window + GPU runtime and a small set of static primitives (line grid,
//! point, square) drawn through wgpu.

pub mod core;
pub mod device;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
