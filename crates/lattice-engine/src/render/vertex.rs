//! CPU-side vertex formats and their GPU layouts.

use bytemuck::{Pod, Zeroable};

/// Vertex layout descriptor recorded by a [`MeshBuffer`](super::MeshBuffer).
///
/// Every layout starts with a 3-float position at location 0; the stride is
/// what distinguishes them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexKind {
    /// `[x, y, z]`, stride 3 floats.
    Position,
    /// `[x, y, z, r, g, b]` interleaved, stride 6 floats.
    PositionColor,
}

impl VertexKind {
    const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const POSITION_COLOR_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    #[inline]
    pub const fn floats_per_vertex(self) -> usize {
        match self {
            Self::Position => 3,
            Self::PositionColor => 6,
        }
    }

    /// Byte distance between consecutive vertices.
    #[inline]
    pub const fn stride(self) -> u64 {
        (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u64
    }

    /// wgpu layout for this kind.
    ///
    /// Point sprites read their buffer per instance, everything else per vertex.
    pub fn buffer_layout(self, step_mode: wgpu::VertexStepMode) -> wgpu::VertexBufferLayout<'static> {
        let attributes: &'static [wgpu::VertexAttribute] = match self {
            Self::Position => &Self::POSITION_ATTRS,
            Self::PositionColor => &Self::POSITION_COLOR_ATTRS,
        };
        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode,
            attributes,
        }
    }
}

/// Implemented by vertex types that can be uploaded into a mesh buffer.
pub trait VertexData: Pod {
    const KIND: VertexKind;
}

/// Position-only vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl VertexData for Vertex {
    const KIND: VertexKind = VertexKind::Position;
}

/// Position + RGB color vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

impl VertexData for ColorVertex {
    const KIND: VertexKind = VertexKind::PositionColor;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_rust_layouts() {
        assert_eq!(VertexKind::Position.stride(), std::mem::size_of::<Vertex>() as u64);
        assert_eq!(
            VertexKind::PositionColor.stride(),
            std::mem::size_of::<ColorVertex>() as u64
        );
    }

    #[test]
    fn position_is_always_location_zero() {
        for kind in [VertexKind::Position, VertexKind::PositionColor] {
            let layout = kind.buffer_layout(wgpu::VertexStepMode::Vertex);
            let first = layout.attributes[0];
            assert_eq!(first.shader_location, 0);
            assert_eq!(first.offset, 0);
            assert_eq!(first.format, wgpu::VertexFormat::Float32x3);
        }
    }

    #[test]
    fn color_attribute_follows_position() {
        let layout = VertexKind::PositionColor.buffer_layout(wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }
}
