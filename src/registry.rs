//! Signature-keyed cache of backing stores and the graphics-context
//! attach point.
//!
//! The registry is an explicit object the embedding renderer owns and
//! threads through chunk construction — there is no global state, which
//! keeps store lifetimes visible and tests isolated. It holds only weak
//! references: the handles themselves share stores through `Rc`, so the
//! last handle out destroys the store and a later acquisition starts
//! fresh at zero capacity.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::signature::Signature;
use crate::store::{ElementStore, GpuLink, VertexStore};

/// Owner of at-most-one backing store per signature plus the shared
/// element store, and the funnel for context lifecycle events.
///
/// `attach_context` / `detach_context` are the two callbacks the
/// embedding application wires to its context lifecycle (swapchain
/// rebuild, device loss recovery, window re-creation). Between a detach
/// and the next attach every store runs shadow-only: writes land in CPU
/// memory and draws are skipped, with nothing lost.
#[derive(Default)]
pub struct ChunkRegistry {
    vertex_stores: [Weak<RefCell<VertexStore>>; Signature::COUNT],
    element_store: Weak<RefCell<ElementStore>>,
    gpu: Option<GpuLink>,
}

impl ChunkRegistry {
    /// Registry with no stores and no context attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a graphics context is currently attached.
    #[must_use]
    pub const fn has_context(&self) -> bool {
        self.gpu.is_some()
    }

    /// A context is (re)available. Existing stores rebuild their GPU
    /// buffers from shadow data; stores created from now on upload
    /// directly.
    pub fn attach_context(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let link = GpuLink {
            device: device.clone(),
            queue: queue.clone(),
        };
        self.gpu = Some(link.clone());
        for store in self.vertex_stores.iter().filter_map(Weak::upgrade) {
            store.borrow_mut().context_restored(link.clone());
        }
        if let Some(store) = self.element_store.upgrade() {
            store.borrow_mut().context_restored(link);
        }
    }

    /// The context is about to go away. Stores drop their GPU buffers and
    /// fall back to shadow-only operation; chunk offsets, lengths, and
    /// reference counts are unaffected.
    pub fn detach_context(&mut self) {
        self.gpu = None;
        for store in self.vertex_stores.iter().filter_map(Weak::upgrade) {
            store.borrow_mut().context_lost();
        }
        if let Some(store) = self.element_store.upgrade() {
            store.borrow_mut().context_lost();
        }
    }

    /// The store for `signature`, creating it at zero capacity if no
    /// handle currently keeps one alive.
    pub(crate) fn acquire_vertex(
        &mut self,
        signature: Signature,
    ) -> Rc<RefCell<VertexStore>> {
        let slot = &mut self.vertex_stores[signature.index()];
        if let Some(store) = slot.upgrade() {
            return store;
        }
        let store = Rc::new(RefCell::new(VertexStore::new(
            signature,
            self.gpu.clone(),
        )));
        *slot = Rc::downgrade(&store);
        store
    }

    /// The shared element store, creating it if necessary.
    pub(crate) fn acquire_elements(&mut self) -> Rc<RefCell<ElementStore>> {
        if let Some(store) = self.element_store.upgrade() {
            return store;
        }
        let store = Rc::new(RefCell::new(ElementStore::new(self.gpu.clone())));
        self.element_store = Rc::downgrade(&store);
        store
    }

    #[cfg(test)]
    pub(crate) fn vertex_store(
        &self,
        signature: Signature,
    ) -> Option<Rc<RefCell<VertexStore>>> {
        self.vertex_stores[signature.index()].upgrade()
    }

    #[cfg(test)]
    pub(crate) fn element_store(&self) -> Option<Rc<RefCell<ElementStore>>> {
        self.element_store.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_is_idempotent_while_a_reference_lives() {
        let mut registry = ChunkRegistry::new();
        let first = registry.acquire_vertex(Signature::Vt);
        let second = registry.acquire_vertex(Signature::Vt);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(Rc::strong_count(&first), 2);
    }

    #[test]
    fn signatures_get_distinct_stores() {
        let mut registry = ChunkRegistry::new();
        let vt = registry.acquire_vertex(Signature::Vt);
        let vn = registry.acquire_vertex(Signature::Vn);
        assert_eq!(vt.borrow().signature(), Signature::Vt);
        assert_eq!(vn.borrow().signature(), Signature::Vn);
    }

    #[test]
    fn dropping_the_last_reference_destroys_the_store() {
        let mut registry = ChunkRegistry::new();
        let store = registry.acquire_vertex(Signature::V);
        let _ = store.borrow_mut().reserve(32);
        drop(store);
        assert!(registry.vertex_store(Signature::V).is_none());
        // Reacquisition starts fresh at zero capacity.
        let fresh = registry.acquire_vertex(Signature::V);
        assert_eq!(fresh.borrow().capacity(), 0);
    }

    #[test]
    fn detach_without_attach_is_harmless() {
        let mut registry = ChunkRegistry::new();
        let store = registry.acquire_vertex(Signature::Vc);
        registry.detach_context();
        assert!(!registry.has_context());
        assert!(!store.borrow().is_live());
    }
}
