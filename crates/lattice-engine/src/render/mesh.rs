//! GPU buffer wrapper shared by all primitives.
//!
//! A [`MeshBuffer`] owns one vertex buffer, an optional index buffer and the
//! layout of the vertices stored in it. Storage is allocated and filled once
//! at construction (static data) and released when the wrapper is dropped.
//!
//! The graphics API is reached only through [`BufferAllocator`],
//! [`GpuBuffer`] and [`DrawPass`], which are implemented for wgpu and for
//! the recording doubles used in tests.

use wgpu::util::DeviceExt;

use super::pass::DrawPass;
use super::vertex::{VertexData, VertexKind};

/// What a buffer is bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferRole {
    Vertex,
    Index,
}

impl BufferRole {
    fn usages(self) -> wgpu::BufferUsages {
        match self {
            Self::Vertex => wgpu::BufferUsages::VERTEX,
            Self::Index => wgpu::BufferUsages::INDEX,
        }
    }
}

/// A GPU-side buffer handle that can be released explicitly.
pub trait GpuBuffer {
    fn destroy(&self);
}

/// Allocates GPU storage and uploads its initial (and only) contents.
pub trait BufferAllocator {
    type Buffer: GpuBuffer;

    fn create_static_buffer(&self, label: &str, role: BufferRole, contents: &[u8]) -> Self::Buffer;
}

/// Vertex buffer + optional index buffer + vertex layout.
///
/// Invariant: `indices` is `Some` iff non-empty index data was supplied at
/// construction. Dropping the wrapper destroys the vertex buffer and, only if
/// it exists, the index buffer.
pub struct MeshBuffer<B: GpuBuffer = wgpu::Buffer> {
    label: String,
    vertices: B,
    indices: Option<B>,
    kind: VertexKind,
    vertex_count: u32,
    index_count: u32,
}

impl<B: GpuBuffer> MeshBuffer<B> {
    /// Uploads `vertices` (and `indices`, when non-empty) as static data.
    ///
    /// The vertex layout is taken from `V`. An empty index slice is treated the
    /// same as `None`: no index buffer is allocated.
    pub fn new<A, V>(alloc: &A, label: &str, vertices: &[V], indices: Option<&[u32]>) -> Self
    where
        A: BufferAllocator<Buffer = B>,
        V: VertexData,
    {
        let vertex_buffer = alloc.create_static_buffer(
            &format!("{label} vbo"),
            BufferRole::Vertex,
            bytemuck::cast_slice(vertices),
        );

        let indices = indices.filter(|i| !i.is_empty());
        let index_buffer = indices.map(|i| {
            alloc.create_static_buffer(
                &format!("{label} ibo"),
                BufferRole::Index,
                bytemuck::cast_slice(i),
            )
        });

        let vertex_count = to_count(vertices.len());
        let index_count = indices.map_or(0, |i| to_count(i.len()));

        log::debug!(
            "mesh buffer `{label}` created: {vertex_count} vertices ({:?}), {index_count} indices",
            V::KIND
        );

        Self {
            label: label.to_string(),
            vertices: vertex_buffer,
            indices: index_buffer,
            kind: V::KIND,
            vertex_count,
            index_count,
        }
    }

    /// Makes this buffer's vertices (and indices, if any) current for the
    /// following draws on `pass`.
    pub fn bind<P>(&self, pass: &mut P)
    where
        P: DrawPass<Buffer = B>,
    {
        pass.set_vertex_buffer(&self.vertices, self.kind);
        if let Some(indices) = &self.indices {
            pass.set_index_buffer(indices);
        }
    }

    #[inline]
    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices, `0` for non-indexed buffers.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    #[inline]
    pub fn has_indices(&self) -> bool {
        self.indices.is_some()
    }
}

impl<B: GpuBuffer> Drop for MeshBuffer<B> {
    fn drop(&mut self) {
        self.vertices.destroy();
        if let Some(indices) = &self.indices {
            indices.destroy();
        }
        log::debug!("mesh buffer `{}` destroyed", self.label);
    }
}

impl<B: GpuBuffer> std::fmt::Debug for MeshBuffer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshBuffer")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count)
            .finish()
    }
}

/// Draw counts are `u32` on the GPU side.
fn to_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| {
        log::warn!("mesh has {len} elements; clamping draw count to u32::MAX");
        u32::MAX
    })
}

// ── wgpu ──────────────────────────────────────────────────────────────────

impl GpuBuffer for wgpu::Buffer {
    fn destroy(&self) {
        wgpu::Buffer::destroy(self);
    }
}

impl BufferAllocator for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn create_static_buffer(&self, label: &str, role: BufferRole, contents: &[u8]) -> wgpu::Buffer {
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: role.usages(),
        })
    }
}
