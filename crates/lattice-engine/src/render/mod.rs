//! GPU rendering subsystem.
//!
//! Primitives own a [`MeshBuffer`] with static vertex data and draw through a
//! [`DrawPass`]. [`PrimitiveRenderer`] provides the wgpu-backed pass with one
//! pipeline per supported primitive/vertex-layout pair.
//!
//! Convention:
//! - Vertex positions are normalized device coordinates (`[-1, 1]`, +Y up).
//! - Pixel sizes (point size) are converted to NDC with the viewport uniform.

mod ctx;
pub mod geometry;
mod mesh;
mod pass;
mod pipeline;
mod shader;
pub mod shapes;
mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{BufferAllocator, BufferRole, GpuBuffer, MeshBuffer};
pub use pass::{DrawPass, FramePass, Primitive, Topology};
pub use pipeline::{POINT_SLOTS, PipelineKey, PipelineSet, PrimitiveRenderer};
pub use shader::{FRAGMENT_ENTRY, ShaderError, ShaderProgram, VERTEX_ENTRY, declares_entry_point, validate_source};
pub use vertex::{ColorVertex, Vertex, VertexData, VertexKind};
