//! Element (index) backing store: one growable GPU index buffer shared by
//! every element chunk, mirrored by a CPU shadow.

use wgpu::util::DeviceExt;

use super::{grown_capacity, GpuLink};
use crate::region::RegionAllocator;

/// The GPU half of the element store.
struct LiveGpu {
    link: GpuLink,
    buffer: Option<wgpu::Buffer>,
}

/// Backing store for indexed drawing. There is a single index layout
/// (`u32`), so unlike vertex stores only one of these ever exists at a
/// time, shared by every element chunk.
pub(crate) struct ElementStore {
    regions: RegionAllocator,
    shadow: Vec<u32>,
    gpu: Option<LiveGpu>,
    generation: u64,
}

impl ElementStore {
    pub(crate) fn new(link: Option<GpuLink>) -> Self {
        log::debug!("creating element store");
        Self {
            regions: RegionAllocator::new(),
            shadow: Vec::new(),
            gpu: link.map(|link| LiveGpu { link, buffer: None }),
            generation: 0,
        }
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    /// Claim `len` contiguous indices, growing the store if needed.
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

    pub(crate) fn free(&mut self, start: u32) {
        self.regions.free(start);
    }

    /// Copy indices into the shadow at `start`, mirroring the sub-range
    /// to the GPU buffer when one exists.
    pub(crate) fn write(&mut self, start: u32, indices: &[u32]) {
        let offset = start as usize;
        self.shadow[offset..offset + indices.len()].copy_from_slice(indices);

        if let Some(gpu) = &self.gpu {
            if let Some(buffer) = &gpu.buffer {
                gpu.link.queue.write_buffer(
                    buffer,
                    (offset * size_of::<u32>()) as wgpu::BufferAddress,
                    bytemuck::cast_slice(indices),
                );
            }
        }
    }

    pub(crate) fn context_lost(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!("element store lost its context");
        }
    }

    pub(crate) fn context_restored(&mut self, link: GpuLink) {
        self.gpu = Some(LiveGpu { link, buffer: None });
        self.recreate_buffer();
    }

    fn grow(&mut self, request: u32) {
        let old_capacity = self.regions.capacity();
        let new_capacity = grown_capacity(old_capacity, request);
        self.regions.grow(new_capacity - old_capacity);
        self.shadow.resize(new_capacity as usize, 0);
        self.generation += 1;
        log::debug!(
            "element store grew {old_capacity} -> {new_capacity} indices"
        );
        self.recreate_buffer();
    }

    fn recreate_buffer(&mut self) {
        if self.regions.capacity() == 0 {
            return;
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.buffer = Some(gpu.link.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("chunkpool elements"),
                contents: bytemuck::cast_slice(&self.shadow),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            },
        ));
    }

    /// Bind the shared index buffer. Returns `false` (skip the draw) while
    /// the context is lost or the store is empty.
    pub(crate) fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(gpu) = &self.gpu else {
            return false;
        };
        let Some(buffer) = &gpu.buffer else {
            return false;
        };
        pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
        true
    }

    #[cfg(test)]
    pub(crate) const fn capacity(&self) -> u32 {
        self.regions.capacity()
    }

    #[cfg(test)]
    pub(crate) fn shadow(&self) -> &[u32] {
        &self.shadow
    }
}

impl Drop for ElementStore {
    fn drop(&mut self) {
        log::debug!("destroying element store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_write_and_grow_preserve_indices() {
        let mut elements = ElementStore::new(None);
        let a = elements.reserve(6);
        elements.write(a, &[0, 1, 2, 2, 1, 3]);
        let before = elements.generation();
        let b = elements.reserve(500);
        assert!(elements.generation() > before);
        assert_ne!(a, b);
        let offset = a as usize;
        assert_eq!(&elements.shadow()[offset..offset + 6], &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn capacity_floor_matches_vertex_stores() {
        let mut elements = ElementStore::new(None);
        let _ = elements.reserve(1);
        assert_eq!(elements.capacity(), 256);
    }
}
