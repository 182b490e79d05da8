//! GPU-free doubles for the buffer and draw capabilities.

use std::cell::RefCell;
use std::rc::Rc;

use super::mesh::{BufferAllocator, BufferRole, GpuBuffer};
use super::pass::{DrawPass, Primitive};
use super::vertex::VertexKind;

#[derive(Debug, Default)]
struct Log {
    created: Vec<(String, BufferRole, Vec<u8>)>,
    destroyed: Vec<String>,
}

/// Allocator that records every allocation and release.
#[derive(Debug, Default)]
pub(crate) struct RecordingAllocator {
    log: Rc<RefCell<Log>>,
}

impl RecordingAllocator {
    /// `(label, role, byte length)` per allocation, in order.
    pub(crate) fn created(&self) -> Vec<(String, BufferRole, usize)> {
        self.log
            .borrow()
            .created
            .iter()
            .map(|(label, role, bytes)| (label.clone(), *role, bytes.len()))
            .collect()
    }

    pub(crate) fn contents(&self, label: &str) -> Option<Vec<u8>> {
        self.log
            .borrow()
            .created
            .iter()
            .find(|(l, _, _)| l == label)
            .map(|(_, _, bytes)| bytes.clone())
    }

    pub(crate) fn destroyed(&self) -> Vec<String> {
        self.log.borrow().destroyed.clone()
    }
}

#[derive(Debug)]
pub(crate) struct RecordedBuffer {
    label: String,
    log: Rc<RefCell<Log>>,
}

impl GpuBuffer for RecordedBuffer {
    fn destroy(&self) {
        self.log.borrow_mut().destroyed.push(self.label.clone());
    }
}

impl BufferAllocator for RecordingAllocator {
    type Buffer = RecordedBuffer;

    fn create_static_buffer(&self, label: &str, role: BufferRole, contents: &[u8]) -> RecordedBuffer {
        self.log
            .borrow_mut()
            .created
            .push((label.to_string(), role, contents.to_vec()));
        RecordedBuffer {
            label: label.to_string(),
            log: Rc::clone(&self.log),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    VertexBuffer(String, VertexKind),
    IndexBuffer(String),
    Draw(Primitive, u32),
    DrawIndexed(Primitive, u32),
}

/// Draw pass that records the command stream.
#[derive(Debug, Default)]
pub(crate) struct RecordingPass {
    pub(crate) events: Vec<Event>,
}

impl DrawPass for RecordingPass {
    type Buffer = RecordedBuffer;

    fn set_vertex_buffer(&mut self, buffer: &RecordedBuffer, kind: VertexKind) {
        self.events.push(Event::VertexBuffer(buffer.label.clone(), kind));
    }

    fn set_index_buffer(&mut self, buffer: &RecordedBuffer) {
        self.events.push(Event::IndexBuffer(buffer.label.clone()));
    }

    fn draw(&mut self, primitive: Primitive, count: u32) {
        self.events.push(Event::Draw(primitive, count));
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: u32) {
        self.events.push(Event::DrawIndexed(primitive, count));
    }
}
