use crate::render::geometry::{SQUARE_INDICES, colored_square_vertices, square_vertices};
use crate::render::mesh::{BufferAllocator, GpuBuffer, MeshBuffer};
use crate::render::pass::{DrawPass, Primitive};

/// Small indexed square around the origin, drawn as two triangles.
#[derive(Debug)]
pub struct Square<B: GpuBuffer = wgpu::Buffer> {
    mesh: MeshBuffer<B>,
}

impl<B: GpuBuffer> Square<B> {
    /// Square filled with the pass color.
    pub fn new<A>(alloc: &A) -> Self
    where
        A: BufferAllocator<Buffer = B>,
    {
        Self {
            mesh: MeshBuffer::new(alloc, "square", &square_vertices(), Some(&SQUARE_INDICES[..])),
        }
    }

    /// Square with `rgb` stored per vertex.
    pub fn with_color<A>(alloc: &A, rgb: [f32; 3]) -> Self
    where
        A: BufferAllocator<Buffer = B>,
    {
        Self {
            mesh: MeshBuffer::new(
                alloc,
                "colored square",
                &colored_square_vertices(rgb),
                Some(&SQUARE_INDICES[..]),
            ),
        }
    }

    pub fn render<P>(&self, pass: &mut P)
    where
        P: DrawPass<Buffer = B>,
    {
        self.mesh.bind(pass);
        pass.draw_indexed(Primitive::Triangles, self.mesh.index_count());
    }

    #[inline]
    pub fn mesh(&self) -> &MeshBuffer<B> {
        &self.mesh
    }
}
