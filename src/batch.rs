//! Multi-draw batches: bind a store once, draw many chunk ranges.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::ChunkError;
use crate::signature::Signature;
use crate::store::VertexStore;
use crate::vertex_chunk::VertexChunk;

/// A captured list of vertex ranges from one backing store, drawn with a
/// single buffer bind instead of one per chunk.
///
/// The batch records only offsets and lengths; it takes no ownership and
/// must not outlive the chunks it was captured from. Two staleness
/// hazards are checked at draw time instead of trusted: the store may
/// have been destroyed (every captured chunk dropped), or it may have
/// grown and rebuilt its buffers since capture. Both yield
/// [`ChunkError::StaleBatch`] — recapture from the live chunks.
#[derive(Debug)]
pub struct ChunkBatch {
    store: Weak<RefCell<VertexStore>>,
    signature: Option<Signature>,
    generation: u64,
    ranges: Vec<(u32, u32)>,
}

impl ChunkBatch {
    /// Record the ranges of `chunks` for batched drawing. Empty chunks
    /// are skipped; all non-empty ones must come from the same backing
    /// store, which implies a shared signature.
    ///
    /// # Errors
    ///
    /// [`ChunkError::SignatureMismatch`] when two non-empty chunks carry
    /// different signatures, and [`ChunkError::StoreMismatch`] when they
    /// share a signature but were allocated through different
    /// registries; either way their ranges index different buffers and
    /// cannot share a bind.
    pub fn capture(chunks: &[&VertexChunk]) -> Result<Self, ChunkError> {
        let mut batch = Self {
            store: Weak::new(),
            signature: None,
            generation: 0,
            ranges: Vec::with_capacity(chunks.len()),
        };
        let mut first_store: Option<&Rc<RefCell<VertexStore>>> = None;
        for chunk in chunks {
            let Some((store, signature, start, len)) = chunk.parts() else {
                continue;
            };
            if let (Some(expected), Some(first)) = (batch.signature, first_store)
            {
                if expected != signature {
                    return Err(ChunkError::SignatureMismatch {
                        expected,
                        found: signature,
                    });
                }
                if !Rc::ptr_eq(first, store) {
                    return Err(ChunkError::StoreMismatch);
                }
            } else {
                batch.signature = Some(signature);
                batch.generation = store.borrow().generation();
                batch.store = Rc::downgrade(store);
                first_store = Some(store);
            }
            batch.ranges.push((start, len));
        }
        Ok(batch)
    }

    /// Number of ranges captured.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the batch captured no ranges at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Signature of the captured ranges, `None` for an empty batch.
    #[must_use]
    pub const fn signature(&self) -> Option<Signature> {
        self.signature
    }

    /// Bind the backing store once and draw every captured range. A
    /// no-op `Ok` for empty batches; draws are skipped (still `Ok`)
    /// while the context is lost.
    ///
    /// # Errors
    ///
    /// [`ChunkError::StaleBatch`] when the backing store was destroyed
    /// or grew since capture.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), ChunkError> {
        if self.ranges.is_empty() {
            return Ok(());
        }
        let Some(store) = self.store.upgrade() else {
            return Err(ChunkError::StaleBatch);
        };
        let store = store.borrow();
        if store.generation() != self.generation {
            return Err(ChunkError::StaleBatch);
        }
        if store.bind(pass) {
            for &(start, len) in &self.ranges {
                pass.draw(start..start + len, 0..1);
            }
        }
        Ok(())
    }
}
