//! Draw submission.
//!
//! [`DrawPass`] is the narrow command surface primitives draw through:
//! bind a vertex (and index) buffer, then draw a primitive kind with a count.
//! [`FramePass`] implements it on top of a wgpu render pass and the pipeline
//! set owned by [`PrimitiveRenderer`](super::PrimitiveRenderer).

use super::pipeline::{PipelineKey, PipelineSet, PointParams, SlotCounter};
use super::vertex::VertexKind;

/// Primitive kind for a draw call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Primitive {
    /// Independent 2-vertex segments.
    Lines,
    /// Independent 3-vertex triangles.
    Triangles,
    /// Square points, `size` in physical pixels.
    Points { size: f32 },
}

impl Primitive {
    #[inline]
    pub fn topology(self) -> Topology {
        match self {
            Self::Lines => Topology::Lines,
            Self::Triangles => Topology::Triangles,
            Self::Points { .. } => Topology::Points,
        }
    }
}

/// Primitive kind without per-draw parameters (pipeline cache key).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Lines,
    Triangles,
    Points,
}

/// Command surface used by mesh buffers and shapes.
pub trait DrawPass {
    type Buffer;

    /// Binds `buffer` as the vertex source, laid out as `kind`.
    fn set_vertex_buffer(&mut self, buffer: &Self::Buffer, kind: VertexKind);

    /// Binds `buffer` as the `u32` index source.
    fn set_index_buffer(&mut self, buffer: &Self::Buffer);

    /// Draws `count` vertices (or points) from the bound vertex buffer.
    fn draw(&mut self, primitive: Primitive, count: u32);

    /// Draws `count` indices from the bound index buffer.
    fn draw_indexed(&mut self, primitive: Primitive, count: u32);
}

/// Why a draw was dropped instead of recorded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) enum SkipReason {
    /// Zero vertices or indices requested.
    Empty,
    /// No vertex buffer bound.
    Unbound,
    /// Indexed draw without an index buffer bound.
    NoIndexBuffer,
    /// No pipeline draws this primitive from this vertex layout.
    Unsupported(PipelineKey),
}

/// Outcome of checking a draw against the current bindings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) enum DrawPlan {
    Draw(PipelineKey),
    Skip(SkipReason),
}

/// Decides whether a draw can be recorded and with which pipeline.
pub(super) fn plan_draw(
    bound: Option<VertexKind>,
    index_bound: bool,
    primitive: Primitive,
    count: u32,
    indexed: bool,
) -> DrawPlan {
    if count == 0 {
        return DrawPlan::Skip(SkipReason::Empty);
    }
    let Some(kind) = bound else {
        return DrawPlan::Skip(SkipReason::Unbound);
    };
    if indexed && !index_bound {
        return DrawPlan::Skip(SkipReason::NoIndexBuffer);
    }

    let key = PipelineKey::new(primitive.topology(), kind);
    // Points are expanded per instance and cannot be indexed.
    if !key.is_supported() || (indexed && key.topology == Topology::Points) {
        return DrawPlan::Skip(SkipReason::Unsupported(key));
    }
    DrawPlan::Draw(key)
}

/// A wgpu render pass with the primitive pipelines attached.
///
/// Created by [`PrimitiveRenderer::begin_pass`](super::PrimitiveRenderer::begin_pass).
/// Draws that cannot be served are skipped with a
/// one-time debug message.
pub struct FramePass<'a> {
    pass: wgpu::RenderPass<'a>,
    set: &'a PipelineSet,
    queue: &'a wgpu::Queue,
    bound: Option<VertexKind>,
    index_bound: bool,
    point_slots: SlotCounter,
}

impl<'a> FramePass<'a> {
    pub(super) fn new(pass: wgpu::RenderPass<'a>, set: &'a PipelineSet, queue: &'a wgpu::Queue) -> Self {
        Self {
            pass,
            set,
            queue,
            bound: None,
            index_bound: false,
            point_slots: SlotCounter::default(),
        }
    }

    /// Sets pipeline and bind groups for the draw.
    ///
    /// Returns `false` when the draw must be skipped.
    fn prepare(&mut self, primitive: Primitive, count: u32, indexed: bool) -> bool {
        let set = self.set;
        let key = match plan_draw(self.bound, self.index_bound, primitive, count, indexed) {
            DrawPlan::Draw(key) => key,
            DrawPlan::Skip(reason) => {
                set.warn_once_skipped(reason);
                return false;
            }
        };
        let Some(pipeline) = set.pipeline(key) else {
            set.warn_once_skipped(SkipReason::Unsupported(key));
            return false;
        };

        self.pass.set_pipeline(pipeline);
        self.pass.set_bind_group(0, set.globals_bind_group(), &[]);

        if let Primitive::Points { size } = primitive {
            let offset = self.next_point_slot(size);
            self.pass.set_bind_group(1, set.point_bind_group(), &[offset]);
        }

        true
    }

    /// Writes `size` into a fresh point-parameter slot and returns its
    /// dynamic offset.
    ///
    /// Slots are not reused within a frame, so points drawn with different
    /// sizes keep them. Past capacity the last slot is shared (last write wins).
    fn next_point_slot(&mut self, size: f32) -> u32 {
        let ring = self.set.point_ring();
        let pick = self.point_slots.next(ring.capacity());
        if pick.overflowed {
            self.set.warn_once_point_overflow();
        }

        let offset = ring.offset(pick.slot);
        let params = PointParams::new(size);
        self.queue
            .write_buffer(ring.buffer(), u64::from(offset), bytemuck::bytes_of(&params));
        offset
    }
}

impl DrawPass for FramePass<'_> {
    type Buffer = wgpu::Buffer;

    fn set_vertex_buffer(&mut self, buffer: &wgpu::Buffer, kind: VertexKind) {
        // Zero-sized slices are rejected by wgpu.
        if buffer.size() == 0 {
            self.bound = None;
            return;
        }
        self.pass.set_vertex_buffer(0, buffer.slice(..));
        self.bound = Some(kind);
        self.index_bound = false;
    }

    fn set_index_buffer(&mut self, buffer: &wgpu::Buffer) {
        if buffer.size() == 0 {
            self.index_bound = false;
            return;
        }
        self.pass
            .set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.index_bound = true;
    }

    fn draw(&mut self, primitive: Primitive, count: u32) {
        if !self.prepare(primitive, count, false) {
            return;
        }
        match primitive {
            // One 6-vertex quad per point, the point buffer steps per instance.
            Primitive::Points { .. } => self.pass.draw(0..6, 0..count),
            Primitive::Lines | Primitive::Triangles => self.pass.draw(0..count, 0..1),
        }
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
        if self.prepare(primitive, count, true) {
            self.pass.draw_indexed(0..count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: Primitive = Primitive::Points { size: 10.0 };

    #[test]
    fn topology_drops_point_size() {
        assert_eq!(POINT.topology(), Topology::Points);
        assert_eq!(Primitive::Lines.topology(), Topology::Lines);
        assert_eq!(Primitive::Triangles.topology(), Topology::Triangles);
    }

    #[test]
    fn bound_draws_pick_their_pipeline() {
        assert_eq!(
            plan_draw(Some(VertexKind::Position), false, Primitive::Lines, 84, false),
            DrawPlan::Draw(PipelineKey::new(Topology::Lines, VertexKind::Position))
        );
        assert_eq!(
            plan_draw(Some(VertexKind::PositionColor), true, Primitive::Triangles, 6, true),
            DrawPlan::Draw(PipelineKey::new(Topology::Triangles, VertexKind::PositionColor))
        );
        assert_eq!(
            plan_draw(Some(VertexKind::Position), false, POINT, 1, false),
            DrawPlan::Draw(PipelineKey::new(Topology::Points, VertexKind::Position))
        );
    }

    #[test]
    fn draw_without_vertex_buffer_is_skipped() {
        assert_eq!(
            plan_draw(None, false, Primitive::Lines, 4, false),
            DrawPlan::Skip(SkipReason::Unbound)
        );
        assert_eq!(
            plan_draw(None, true, Primitive::Triangles, 6, true),
            DrawPlan::Skip(SkipReason::Unbound)
        );
    }

    #[test]
    fn indexed_draw_without_index_buffer_is_skipped() {
        assert_eq!(
            plan_draw(Some(VertexKind::Position), false, Primitive::Triangles, 6, true),
            DrawPlan::Skip(SkipReason::NoIndexBuffer)
        );
    }

    #[test]
    fn empty_draws_are_skipped_before_anything_else() {
        assert_eq!(
            plan_draw(None, false, Primitive::Lines, 0, false),
            DrawPlan::Skip(SkipReason::Empty)
        );
    }

    #[test]
    fn colored_and_indexed_points_are_unsupported() {
        let colored = PipelineKey::new(Topology::Points, VertexKind::PositionColor);
        assert_eq!(
            plan_draw(Some(VertexKind::PositionColor), false, POINT, 1, false),
            DrawPlan::Skip(SkipReason::Unsupported(colored))
        );

        let flat = PipelineKey::new(Topology::Points, VertexKind::Position);
        assert_eq!(
            plan_draw(Some(VertexKind::Position), true, POINT, 1, true),
            DrawPlan::Skip(SkipReason::Unsupported(flat))
        );
    }
}
