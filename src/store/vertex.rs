//! Vertex backing store: one growable GPU buffer per attribute of one
//! signature, mirrored by CPU shadow arrays.

use wgpu::util::DeviceExt;

use super::{grown_capacity, GpuLink};
use crate::region::RegionAllocator;
use crate::signature::{Attribute, Signature};

/// The GPU half of a store, present only while a context is attached.
struct LiveGpu {
    link: GpuLink,
    /// One buffer per attribute the signature carries, created once the
    /// store has nonzero capacity.
    buffers: [Option<wgpu::Buffer>; Attribute::COUNT],
}

/// Backing store for every live chunk of one [`Signature`].
///
/// The registry creates at most one per signature; handles share it
/// through `Rc`, whose strong count is the live-handle reference count.
/// `gpu` is the explicit context lifecycle: `None` is lost, `Some` is
/// live. Losing the context drops only the GPU buffers; offsets, lengths,
/// and shadow contents are untouched.
pub(crate) struct VertexStore {
    signature: Signature,
    regions: RegionAllocator,
    /// Shadow data per attribute, `Some` only for attributes the
    /// signature carries; each sized `capacity * components`.
    shadows: [Option<Vec<f32>>; Attribute::COUNT],
    gpu: Option<LiveGpu>,
    /// Bumped on every growth; batches validate against it at draw time
    /// since growth relocates nothing but invalidates captured buffers'
    /// assumptions about capacity.
    generation: u64,
}

impl VertexStore {
    pub(crate) fn new(signature: Signature, link: Option<GpuLink>) -> Self {
        log::debug!("creating {} vertex store", signature.label());
        Self {
            signature,
            regions: RegionAllocator::new(),
            shadows: std::array::from_fn(|i| {
                signature.has(Attribute::ALL[i]).then(Vec::new)
            }),
            gpu: link.map(|link| LiveGpu {
                link,
                buffers: [None, None, None, None],
            }),
            generation: 0,
        }
    }

    pub(crate) const fn signature(&self) -> Signature {
        self.signature
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    /// Claim `len` contiguous elements, growing the store if the region
    /// allocator cannot satisfy the request as-is.
    pub(crate) fn reserve(&mut self, len: u32) -> u32 {
        if let Ok(start) = self.regions.allocate(len) {
            return start;
        }
        self.grow(len);
        let Ok(start) = self.regions.allocate(len) else {
            unreachable!("growth adds at least the requested size")
        };
        start
    }

    /// Return a reserved range; the handle owning `start` is going away.
    pub(crate) fn free(&mut self, start: u32) {
        self.regions.free(start);
    }

    /// Copy flattened attribute data (`element count * components` floats)
    /// into the shadow at element `start`, mirroring to the GPU buffer
    /// when one exists. Writes for attributes outside the signature are
    /// dropped with a warning.
    pub(crate) fn write(&mut self, attribute: Attribute, start: u32, data: &[f32]) {
        let Some(shadow) = &mut self.shadows[attribute.index()] else {
            log::warn!(
                "{} store has no {} attribute; write ignored",
                self.signature.label(),
                attribute.name()
            );
            return;
        };
        let offset = start as usize * attribute.components();
        shadow[offset..offset + data.len()].copy_from_slice(data);

        if let Some(gpu) = &self.gpu {
            if let Some(buffer) = &gpu.buffers[attribute.index()] {
                gpu.link.queue.write_buffer(
                    buffer,
                    (offset * size_of::<f32>()) as wgpu::BufferAddress,
                    bytemuck::cast_slice(data),
                );
            }
        }
    }

    /// The context is going away. Drop the GPU buffers; the shadows keep
    /// every live chunk's data for the restore.
    pub(crate) fn context_lost(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!("{} vertex store lost its context", self.signature.label());
        }
    }

    /// A context is available again: rebuild the GPU buffers at current
    /// capacity and upload each shadow in one transfer.
    pub(crate) fn context_restored(&mut self, link: GpuLink) {
        self.gpu = Some(LiveGpu {
            link,
            buffers: [None, None, None, None],
        });
        self.recreate_buffers();
    }

    /// Grow capacity to cover a `request`-element allocation, resizing
    /// shadows and rebuilding GPU buffers from them.
    fn grow(&mut self, request: u32) {
        let old_capacity = self.regions.capacity();
        let new_capacity = grown_capacity(old_capacity, request);
        self.regions.grow(new_capacity - old_capacity);
        for (i, shadow) in self.shadows.iter_mut().enumerate() {
            if let Some(shadow) = shadow {
                shadow.resize(
                    new_capacity as usize * Attribute::ALL[i].components(),
                    0.0,
                );
            }
        }
        self.generation += 1;
        log::debug!(
            "{} vertex store grew {old_capacity} -> {new_capacity} elements",
            self.signature.label()
        );
        self.recreate_buffers();
    }

    /// (Re)create one buffer per present attribute from shadow contents.
    /// No-op while the context is lost or the store is still empty.
    fn recreate_buffers(&mut self) {
        if self.regions.capacity() == 0 {
            return;
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        for (i, shadow) in self.shadows.iter().enumerate() {
            let Some(shadow) = shadow else {
                continue;
            };
            let label = format!(
                "chunkpool {} {}",
                self.signature.label(),
                Attribute::ALL[i].name()
            );
            gpu.buffers[i] = Some(gpu.link.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(&label),
                    contents: bytemuck::cast_slice(shadow),
                    usage: wgpu::BufferUsages::VERTEX
                        | wgpu::BufferUsages::COPY_DST,
                },
            ));
        }
    }

    /// Bind every present attribute buffer at consecutive slots in
    /// attribute order. Returns `false` (nothing bound, skip the draw)
    /// while the context is lost or the store is empty.
    pub(crate) fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(gpu) = &self.gpu else {
            return false;
        };
        let mut bound = false;
        for (slot, buffer) in gpu.buffers.iter().flatten().enumerate() {
            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            bound = true;
        }
        bound
    }

    /// Bind only the position buffer at slot 0, for position-only
    /// pipelines (shadow volumes and the like).
    pub(crate) fn bind_position_only(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(gpu) = &self.gpu else {
            return false;
        };
        let Some(buffer) = &gpu.buffers[Attribute::Position.index()] else {
            return false;
        };
        pass.set_vertex_buffer(0, buffer.slice(..));
        true
    }

    #[cfg(test)]
    pub(crate) const fn capacity(&self) -> u32 {
        self.regions.capacity()
    }

    #[cfg(test)]
    pub(crate) fn shadow(&self, attribute: Attribute) -> Option<&[f32]> {
        self.shadows[attribute.index()].as_deref()
    }

    #[cfg(test)]
    pub(crate) const fn is_live(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Drop for VertexStore {
    fn drop(&mut self) {
        log::debug!("destroying {} vertex store", self.signature.label());
    }
}
