//! Move-only handles over sub-allocated index ranges.

use std::cell::RefCell;
use std::rc::Rc;

use crate::registry::ChunkRegistry;
use crate::store::ElementStore;

struct Owned {
    store: Rc<RefCell<ElementStore>>,
    start: u32,
    len: u32,
}

impl Drop for Owned {
    fn drop(&mut self) {
        self.store.borrow_mut().free(self.start);
    }
}

/// Move-only handle to a contiguous run of `u32` indices inside the
/// shared index buffer.
///
/// Indices are addresses into whatever vertex chunk the caller binds
/// alongside; an element chunk knows nothing about signatures. Same
/// ownership story as [`VertexChunk`](crate::VertexChunk): no `Clone`,
/// drop frees the range, the last handle out destroys the store.
#[derive(Default)]
pub struct ElementChunk {
    owned: Option<Owned>,
}

impl ElementChunk {
    /// An empty handle owning nothing; writes and draws are no-ops.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Claim `count` indices from the shared element store, creating the
    /// store if this is its first live chunk. `count == 0` yields
    /// [`Self::empty`].
    #[must_use]
    pub fn new(registry: &mut ChunkRegistry, count: u32) -> Self {
        if count == 0 {
            return Self::empty();
        }
        let store = registry.acquire_elements();
        let start = store.borrow_mut().reserve(count);
        Self {
            owned: Some(Owned {
                store,
                start,
                len: count,
            }),
        }
    }

    /// Whether this handle owns any indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.owned.is_none()
    }

    /// Number of indices owned.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.owned.as_ref().map_or(0, |owned| owned.len)
    }

    /// First index position within the shared buffer, when non-empty.
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        self.owned.as_ref().map(|owned| owned.start)
    }

    /// Copy indices into the owned range. Indices past the end of the
    /// range are truncated with a warning.
    pub fn write_indices(&mut self, indices: &[u32]) {
        let Some(owned) = &self.owned else {
            return;
        };
        let available = owned.len as usize;
        let indices = if indices.len() > available {
            log::warn!(
                "index write of {} elements truncated to chunk length {}",
                indices.len(),
                owned.len
            );
            &indices[..available]
        } else {
            indices
        };
        if indices.is_empty() {
            return;
        }
        owned.store.borrow_mut().write(owned.start, indices);
    }

    /// Issue an indexed draw over the whole owned range. The caller must
    /// already have bound the vertex buffers the indices address (via
    /// [`VertexChunk`](crate::VertexChunk) or a pipeline of its own).
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.draw_range(pass, self.len(), 0);
    }

    /// Indexed draw of `count` indices beginning `offset` into the owned
    /// range, both clamped to the range.
    pub fn draw_range(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        count: u32,
        offset: u32,
    ) {
        let Some(owned) = &self.owned else {
            return;
        };
        let offset = offset.min(owned.len);
        let count = count.min(owned.len - offset);
        if count == 0 {
            return;
        }
        let store = owned.store.borrow();
        if store.bind(pass) {
            let first = owned.start + offset;
            pass.draw_indexed(first..first + count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_builds_the_empty_handle() {
        let mut registry = ChunkRegistry::new();
        let chunk = ElementChunk::new(&mut registry, 0);
        assert!(chunk.is_empty());
        assert!(registry.element_store().is_none());
    }

    #[test]
    fn chunks_share_the_single_store() {
        let mut registry = ChunkRegistry::new();
        let a = ElementChunk::new(&mut registry, 6);
        let b = ElementChunk::new(&mut registry, 6);
        assert_eq!(a.start(), Some(0));
        assert_eq!(b.start(), Some(6));
        drop(a);
        drop(b);
        assert!(registry.element_store().is_none());
    }

    #[test]
    fn writes_land_in_the_owned_shadow_range() {
        let mut registry = ChunkRegistry::new();
        let _fence = ElementChunk::new(&mut registry, 3);
        let mut quad = ElementChunk::new(&mut registry, 6);
        quad.write_indices(&[0, 1, 2, 2, 1, 3]);
        let store = registry.element_store().unwrap();
        let store = store.borrow();
        let offset = quad.start().unwrap() as usize;
        assert_eq!(&store.shadow()[offset..offset + 6], &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn oversized_write_is_truncated() {
        let mut registry = ChunkRegistry::new();
        let mut short = ElementChunk::new(&mut registry, 2);
        let _fence = ElementChunk::new(&mut registry, 2);
        short.write_indices(&[7, 8, 9]);
        let store = registry.element_store().unwrap();
        let store = store.borrow();
        assert_eq!(&store.shadow()[0..2], &[7, 8]);
        assert_eq!(&store.shadow()[2..4], &[0, 0]);
    }
}
