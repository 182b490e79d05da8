use crate::render::geometry::grid_vertices;
use crate::render::mesh::{BufferAllocator, GpuBuffer, MeshBuffer};
use crate::render::pass::{DrawPass, Primitive};

/// Line grid centered at the origin, see [`grid_vertices`].
#[derive(Debug)]
pub struct Grid<B: GpuBuffer = wgpu::Buffer> {
    mesh: MeshBuffer<B>,
}

impl<B: GpuBuffer> Grid<B> {
    pub fn new<A>(alloc: &A, num_lines: u32, spacing: f32) -> Self
    where
        A: BufferAllocator<Buffer = B>,
    {
        let vertices = grid_vertices(num_lines, spacing);
        Self {
            mesh: MeshBuffer::new(alloc, "grid", &vertices, None),
        }
    }

    pub fn render<P>(&self, pass: &mut P)
    where
        P: DrawPass<Buffer = B>,
    {
        self.mesh.bind(pass);
        pass.draw(Primitive::Lines, self.mesh.vertex_count());
    }

    #[inline]
    pub fn mesh(&self) -> &MeshBuffer<B> {
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Event, RecordingAllocator, RecordingPass};
    use crate::render::vertex::VertexKind;

    #[test]
    fn draws_every_vertex_as_lines() {
        let alloc = RecordingAllocator::default();
        let grid = Grid::new(&alloc, 10, 0.1);
        let mut pass = RecordingPass::default();

        grid.render(&mut pass);

        assert_eq!(
            pass.events,
            vec![
                Event::VertexBuffer("grid vbo".into(), VertexKind::Position),
                Event::Draw(Primitive::Lines, 84),
            ]
        );
    }

    #[test]
    fn allocates_vertex_storage_only() {
        let alloc = RecordingAllocator::default();
        let grid = Grid::new(&alloc, 2, 0.5);

        assert!(!grid.mesh().has_indices());
        // 5 offsets * 4 vertices * 12 bytes
        assert_eq!(alloc.created()[0].2, 240);
        drop(grid);
        assert_eq!(alloc.destroyed(), vec!["grid vbo".to_string()]);
    }
}
