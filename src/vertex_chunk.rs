//! Move-only handles over sub-allocated vertex ranges.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3, Vec4};

use crate::registry::ChunkRegistry;
use crate::signature::{Attribute, Signature};
use crate::store::VertexStore;

/// The owning state of a non-empty chunk. Dropping it returns the range
/// to the store's allocator; dropping the `Rc` afterwards releases the
/// store reference, destroying the store if this was the last handle.
pub(crate) struct Owned {
    store: Rc<RefCell<VertexStore>>,
    signature: Signature,
    start: u32,
    len: u32,
}

impl Drop for Owned {
    fn drop(&mut self) {
        self.store.borrow_mut().free(self.start);
    }
}

/// Move-only handle to a contiguous run of vertices inside the shared
/// buffer set for one [`Signature`].
///
/// A chunk is the sole owner of its `[start, start + len)` range: there
/// is no `Clone`, so no two live handles can ever free or overwrite the
/// same range, and Rust's destructive moves replace the C-style
/// "moved-from sentinel" dance — a moved-from binding simply no longer
/// exists. The empty state is structural (`Option`), so destroying an
/// empty or defaulted chunk is a no-op by construction.
///
/// Writes update the CPU shadow always and the GPU buffer when a context
/// is attached; draws silently skip while the context is lost.
#[derive(Default)]
pub struct VertexChunk {
    owned: Option<Owned>,
}

impl VertexChunk {
    /// An empty handle owning nothing; writes and draws are no-ops.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Claim `count` vertices of `signature` layout from the registry's
    /// store for that signature, creating the store if this is its first
    /// live chunk. `count == 0` yields [`Self::empty`] without touching
    /// any store — the common "not yet built" case.
    #[must_use]
    pub fn new(
        registry: &mut ChunkRegistry,
        signature: Signature,
        count: u32,
    ) -> Self {
        if count == 0 {
            return Self::empty();
        }
        let store = registry.acquire_vertex(signature);
        let start = store.borrow_mut().reserve(count);
        Self {
            owned: Some(Owned {
                store,
                signature,
                start,
                len: count,
            }),
        }
    }

    /// Whether this handle owns any vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.owned.is_none()
    }

    /// Number of vertices owned.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.owned.as_ref().map_or(0, |owned| owned.len)
    }

    /// First element index within the shared buffer, when non-empty.
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        self.owned.as_ref().map(|owned| owned.start)
    }

    /// The signature this chunk was allocated under, when non-empty.
    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        self.owned.as_ref().map(|owned| owned.signature)
    }

    /// Write vertex positions starting at the front of the owned range.
    pub fn write_vertices(&mut self, vertices: &[Vec3]) {
        self.write(Attribute::Position, bytemuck::cast_slice(vertices));
    }

    /// Write texture coordinates. Ignored with a warning unless the
    /// signature carries texcoords.
    pub fn write_texcoords(&mut self, texcoords: &[Vec2]) {
        self.write(Attribute::Texcoord, bytemuck::cast_slice(texcoords));
    }

    /// Write normals. Ignored with a warning unless the signature
    /// carries normals.
    pub fn write_normals(&mut self, normals: &[Vec3]) {
        self.write(Attribute::Normal, bytemuck::cast_slice(normals));
    }

    /// Write RGBA colors. Ignored with a warning unless the signature
    /// carries colors.
    pub fn write_colors(&mut self, colors: &[Vec4]) {
        self.write(Attribute::Color, bytemuck::cast_slice(colors));
    }

    /// Copy flattened attribute data into the owned range. Data past the
    /// end of the range is truncated with a warning: a longer slice is a
    /// caller bug, but one not worth corrupting a neighbor chunk over.
    fn write(&mut self, attribute: Attribute, data: &[f32]) {
        let Some(owned) = &self.owned else {
            return;
        };
        let components = attribute.components();
        let available = owned.len as usize * components;
        let data = if data.len() > available {
            log::warn!(
                "{} write of {} elements truncated to chunk length {}",
                attribute.name(),
                data.len() / components,
                owned.len
            );
            &data[..available]
        } else {
            data
        };
        if data.is_empty() {
            return;
        }
        owned.store.borrow_mut().write(attribute, owned.start, data);
    }

    /// Draw the whole owned range. The pass must have a pipeline bound
    /// whose vertex layout matches [`Signature::buffer_layouts`] for this
    /// chunk's signature; topology comes from that pipeline.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.draw_range(pass, self.len(), 0);
    }

    /// Draw `count` vertices beginning `offset` elements into the owned
    /// range. Both are clamped so the draw can never touch another
    /// chunk's vertices.
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
            pass.draw(first..first + count, 0..1);
        }
    }

    /// Draw the whole range binding only the position buffer, for
    /// position-only pipelines (shadow passes).
    pub fn draw_position_only(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(owned) = &self.owned else {
            return;
        };
        let store = owned.store.borrow();
        if store.bind_position_only(pass) {
            pass.draw(owned.start..owned.start + owned.len, 0..1);
        }
    }

    /// Store, signature, and range of a non-empty chunk, for batch
    /// capture.
    pub(crate) fn parts(
        &self,
    ) -> Option<(&Rc<RefCell<VertexStore>>, Signature, u32, u32)> {
        self.owned
            .as_ref()
            .map(|owned| (&owned.store, owned.signature, owned.start, owned.len))
    }
}
