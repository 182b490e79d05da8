use crate::render::geometry::point_vertex;
use crate::render::mesh::{BufferAllocator, GpuBuffer, MeshBuffer};
use crate::render::pass::{DrawPass, Primitive};

/// A single point at a fixed position.
#[derive(Debug)]
pub struct Point<B: GpuBuffer = wgpu::Buffer> {
    mesh: MeshBuffer<B>,
}

impl<B: GpuBuffer> Point<B> {
    pub fn new<A>(alloc: &A, x: f32, y: f32) -> Self
    where
        A: BufferAllocator<Buffer = B>,
    {
        Self {
            mesh: MeshBuffer::new(alloc, "point", &[point_vertex(x, y)], None),
        }
    }

    /// Draws the point as a square `size` pixels wide.
    pub fn render<P>(&self, pass: &mut P, size: f32)
    where
        P: DrawPass<Buffer = B>,
    {
        self.mesh.bind(pass);
        pass.draw(Primitive::Points { size }, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Event, RecordingAllocator, RecordingPass};
    use crate::render::vertex::{Vertex, VertexKind};

    #[test]
    fn uploads_one_vertex_at_position() {
        let alloc = RecordingAllocator::default();
        let _point = Point::new(&alloc, 0.25, -0.5);

        let bytes = alloc.contents("point vbo");
        let expected = [Vertex::new(0.25, -0.5, 0.0)];
        assert_eq!(bytes, Some(bytemuck::cast_slice::<Vertex, u8>(&expected[..]).to_vec()));
    }

    #[test]
    fn render_passes_size_through() {
        let alloc = RecordingAllocator::default();
        let point = Point::new(&alloc, 0.0, 0.0);
        let mut pass = RecordingPass::default();

        point.render(&mut pass, 10.0);

        assert_eq!(
            pass.events,
            vec![
                Event::VertexBuffer("point vbo".into(), VertexKind::Position),
                Event::Draw(Primitive::Points { size: 10.0 }, 1),
            ]
        );
    }
}
