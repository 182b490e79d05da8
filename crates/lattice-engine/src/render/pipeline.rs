//! Pipelines for the primitive shapes.
//!
//! One render pipeline per supported `(Topology, VertexKind)` pair, built
//! lazily for the current surface format and rebuilt when it changes.

use std::cell::Cell;
use std::collections::HashMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

use super::ctx::{RenderCtx, RenderTarget};
use super::pass::{FramePass, SkipReason, Topology};
use super::shader::{ShaderError, ShaderProgram};
use super::vertex::VertexKind;

const FLAT_WGSL: &str = include_str!("shaders/flat.wgsl");
const COLORED_WGSL: &str = include_str!("shaders/colored.wgsl");
const POINT_WGSL: &str = include_str!("shaders/point.wgsl");

/// Point draws per frame that get their own size slot.
pub const POINT_SLOTS: u32 = 64;

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct Globals {
    pub color: [f32; 4],
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct PointParams {
    pub size: f32,
    pub _pad: [f32; 3],
}

impl PointParams {
    pub(super) fn new(size: f32) -> Self {
        Self {
            size: if size.is_finite() { size.max(0.0) } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

fn uniform_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

// ── keys ──────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub topology: Topology,
    pub vertex: VertexKind,
}

impl PipelineKey {
    #[inline]
    pub const fn new(topology: Topology, vertex: VertexKind) -> Self {
        Self { topology, vertex }
    }

    /// Combinations the bundled shaders can draw.
    pub const SUPPORTED: [PipelineKey; 5] = [
        Self::new(Topology::Lines, VertexKind::Position),
        Self::new(Topology::Lines, VertexKind::PositionColor),
        Self::new(Topology::Triangles, VertexKind::Position),
        Self::new(Topology::Triangles, VertexKind::PositionColor),
        Self::new(Topology::Points, VertexKind::Position),
    ];

    #[inline]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

// ── point size ring ───────────────────────────────────────────────────────

/// Uniform buffer holding [`POINT_SLOTS`] point-size slots addressed by
/// dynamic offset.
pub(super) struct PointRing {
    buffer: wgpu::Buffer,
    stride: u32,
    slots: u32,
}

impl PointRing {
    fn new(device: &wgpu::Device, slots: u32) -> Self {
        let stride = slot_stride(
            std::mem::size_of::<PointParams>() as u32,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lattice point size ring"),
            size: u64::from(stride) * u64::from(slots),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            stride,
            slots,
        }
    }

    #[inline]
    pub(super) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub(super) fn capacity(&self) -> u32 {
        self.slots
    }

    #[inline]
    pub(super) fn offset(&self, slot: u32) -> u32 {
        slot * self.stride
    }
}

/// Slot chosen for one point draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct SlotPick {
    pub slot: u32,
    /// Every slot was already taken this frame; `slot` is the shared last one.
    pub overflowed: bool,
}

/// Hands out point-size slots in draw order for one pass.
#[derive(Debug, Default)]
pub(super) struct SlotCounter {
    used: u32,
}

impl SlotCounter {
    pub(super) fn next(&mut self, capacity: u32) -> SlotPick {
        let last = capacity.saturating_sub(1);
        let pick = SlotPick {
            slot: self.used.min(last),
            overflowed: self.used > last,
        };
        self.used = self.used.saturating_add(1);
        pick
    }
}

/// A flag that reports `true` the first time it is raised.
#[derive(Debug, Default)]
pub(super) struct WarnOnce(Cell<bool>);

impl WarnOnce {
    pub(super) fn first(&self) -> bool {
        !self.0.replace(true)
    }
}

/// Rounds `size` up to the device's dynamic-offset alignment.
fn slot_stride(size: u32, alignment: u32) -> u32 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

// ── pipeline set ──────────────────────────────────────────────────────────

/// Everything a [`FramePass`] needs to serve draws for one surface format.
pub struct PipelineSet {
    format: wgpu::TextureFormat,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    globals_ubo: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    point_ring: PointRing,
    point_bind_group: wgpu::BindGroup,

    warned_unbound: WarnOnce,
    warned_no_index: WarnOnce,
    warned_unsupported: WarnOnce,
    warned_point_overflow: WarnOnce,
}

impl PipelineSet {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, ShaderError> {
        let flat = ShaderProgram::new(device, "lattice flat shader", FLAT_WGSL)?;
        let colored = ShaderProgram::new(device, "lattice colored shader", COLORED_WGSL)?;
        let point = ShaderProgram::new(device, "lattice point shader", POINT_WGSL)?;

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lattice globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: uniform_size::<Globals>(),
                },
                count: None,
            }],
        });

        let point_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lattice point bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: uniform_size::<PointParams>(),
                },
                count: None,
            }],
        });

        let globals_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lattice globals ubo"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lattice globals bind group"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        let point_ring = PointRing::new(device, POINT_SLOTS);
        let point_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lattice point bind group"),
            layout: &point_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: point_ring.buffer(),
                    offset: 0,
                    size: uniform_size::<PointParams>(),
                }),
            }],
        });

        let flat_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lattice flat pipeline layout"),
            bind_group_layouts: &[&globals_bgl],
            immediate_size: 0,
        });
        let point_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lattice point pipeline layout"),
            bind_group_layouts: &[&globals_bgl, &point_bgl],
            immediate_size: 0,
        });

        let mut pipelines = HashMap::with_capacity(PipelineKey::SUPPORTED.len());
        for key in PipelineKey::SUPPORTED {
            let (shader, layout) = match (key.topology, key.vertex) {
                (Topology::Points, _) => (&point, &point_layout),
                (_, VertexKind::Position) => (&flat, &flat_layout),
                (_, VertexKind::PositionColor) => (&colored, &flat_layout),
            };
            let pipeline = build_pipeline(device, format, key, shader, layout);
            pipelines.insert(key, pipeline);
        }

        log::debug!("built {} primitive pipelines for {format:?}", pipelines.len());

        Ok(Self {
            format,
            pipelines,
            globals_ubo,
            globals_bind_group,
            point_ring,
            point_bind_group,
            warned_unbound: WarnOnce::default(),
            warned_no_index: WarnOnce::default(),
            warned_unsupported: WarnOnce::default(),
            warned_point_overflow: WarnOnce::default(),
        })
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    #[inline]
    pub fn pipeline(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&key)
    }

    #[inline]
    pub(super) fn globals_bind_group(&self) -> &wgpu::BindGroup {
        &self.globals_bind_group
    }

    #[inline]
    pub(super) fn point_bind_group(&self) -> &wgpu::BindGroup {
        &self.point_bind_group
    }

    #[inline]
    pub(super) fn point_ring(&self) -> &PointRing {
        &self.point_ring
    }

    pub(super) fn warn_once_skipped(&self, reason: SkipReason) {
        match reason {
            SkipReason::Empty => {}
            SkipReason::Unbound => {
                if self.warned_unbound.first() {
                    log::debug!("draw issued with no vertex buffer bound; skipped");
                }
            }
            SkipReason::NoIndexBuffer => {
                if self.warned_no_index.first() {
                    log::debug!("indexed draw issued with no index buffer bound; skipped");
                }
            }
            SkipReason::Unsupported(key) => {
                if self.warned_unsupported.first() {
                    log::debug!("no pipeline for {key:?}; draw skipped");
                }
            }
        }
    }

    pub(super) fn warn_once_point_overflow(&self) {
        if self.warned_point_overflow.first() {
            log::warn!("more than {POINT_SLOTS} point draws in one frame; extra points share a size");
        }
    }

    fn write_globals(&self, queue: &wgpu::Queue, globals: &Globals) {
        queue.write_buffer(&self.globals_ubo, 0, bytemuck::bytes_of(globals));
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    key: PipelineKey,
    shader: &ShaderProgram,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    let (topology, step_mode) = match key.topology {
        Topology::Lines => (wgpu::PrimitiveTopology::LineList, wgpu::VertexStepMode::Vertex),
        Topology::Triangles => (wgpu::PrimitiveTopology::TriangleList, wgpu::VertexStepMode::Vertex),
        // Points are expanded to quads; the point buffer advances per instance.
        Topology::Points => (wgpu::PrimitiveTopology::TriangleList, wgpu::VertexStepMode::Instance),
    };

    let buffers = [key.vertex.buffer_layout(step_mode)];
    let targets = [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];
    let label = format!("lattice {:?}/{:?} pipeline", key.topology, key.vertex);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: shader.vertex_state(&buffers),
        fragment: Some(shader.fragment_state(&targets)),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Owns the pipeline set and opens frame passes for primitive drawing.
#[derive(Default)]
pub struct PrimitiveRenderer {
    set: Option<PipelineSet>,
}

impl PrimitiveRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the pipelines up front (otherwise done on first pass).
    pub fn prepare(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<(), ShaderError> {
        self.ensure_pipelines(device, format).map(|_| ())
    }

    /// Writes the per-frame uniforms and opens a render pass that loads the
    /// current contents of `target` (clearing is the frame's job).
    ///
    /// `color` is the fill used by the flat and point shaders.
    pub fn begin_pass<'a>(
        &'a mut self,
        ctx: &RenderCtx<'a>,
        target: &'a mut RenderTarget<'_>,
        color: Color,
    ) -> Result<FramePass<'a>, ShaderError> {
        let set = self.ensure_pipelines(ctx.device, ctx.surface_format)?;

        set.write_globals(
            ctx.queue,
            &Globals {
                color: color.clamped().to_array(),
                viewport: ctx.viewport.to_uniform(),
                _pad: [0.0; 2],
            },
        );

        let pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lattice primitive pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Ok(FramePass::new(pass, set, ctx.queue))
    }

    fn ensure_pipelines(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> Result<&PipelineSet, ShaderError> {
        let set = match self.set.take() {
            Some(set) if set.format() == format => set,
            _ => PipelineSet::new(device, format)?,
        };
        Ok(self.set.insert(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_stride_rounds_up_to_alignment() {
        assert_eq!(slot_stride(16, 256), 256);
        assert_eq!(slot_stride(16, 16), 16);
        assert_eq!(slot_stride(300, 256), 512);
        assert_eq!(slot_stride(16, 0), 16);
    }

    #[test]
    fn each_point_draw_gets_its_own_slot_while_free() {
        let mut counter = SlotCounter::default();
        for expected in 0..POINT_SLOTS {
            assert_eq!(
                counter.next(POINT_SLOTS),
                SlotPick {
                    slot: expected,
                    overflowed: false
                }
            );
        }
    }

    #[test]
    fn overflowing_draws_share_the_last_slot() {
        let mut counter = SlotCounter::default();
        for _ in 0..POINT_SLOTS {
            counter.next(POINT_SLOTS);
        }

        let last = SlotPick {
            slot: POINT_SLOTS - 1,
            overflowed: true,
        };
        assert_eq!(counter.next(POINT_SLOTS), last);
        assert_eq!(counter.next(POINT_SLOTS), last);
    }

    #[test]
    fn fresh_counter_starts_over() {
        let mut counter = SlotCounter::default();
        counter.next(2);
        counter.next(2);
        assert!(counter.next(2).overflowed);

        assert_eq!(SlotCounter::default().next(2).slot, 0);
    }

    #[test]
    fn warn_once_fires_a_single_time() {
        let flag = WarnOnce::default();
        assert!(flag.first());
        assert!(!flag.first());
        assert!(!flag.first());
    }

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<Globals>(), 32);
        assert_eq!(std::mem::size_of::<PointParams>(), 16);
    }

    #[test]
    fn point_params_sanitize_size() {
        assert_eq!(PointParams::new(10.0).size, 10.0);
        assert_eq!(PointParams::new(-3.0).size, 0.0);
        assert_eq!(PointParams::new(f32::NAN).size, 0.0);
    }

    #[test]
    fn colored_points_are_not_supported() {
        assert!(!PipelineKey::new(Topology::Points, VertexKind::PositionColor).is_supported());
        assert!(PipelineKey::new(Topology::Points, VertexKind::Position).is_supported());
        assert!(PipelineKey::new(Topology::Lines, VertexKind::PositionColor).is_supported());
    }
}
