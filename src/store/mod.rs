//! Backing stores: the shared GPU buffers (plus CPU shadows) behind all
//! chunks of one signature.
//!
//! Stores are created lazily by the registry and die with their last
//! handle. Each one wraps a region allocator, keeps every element's data
//! in CPU shadow arrays, and mirrors written sub-ranges to the GPU while a
//! context is attached. The shadow is authoritative: growth and context
//! restoration both rebuild the GPU side from it, never the other way
//! around — reading back from the GPU is slow and, mid context loss,
//! impossible.

mod element;
mod vertex;

pub(crate) use element::ElementStore;
pub(crate) use vertex::VertexStore;

/// Capacity floor for the first growth step. Doubling from tiny sizes
/// would churn through reallocations; most chunks are a handful of
/// vertices, so start with room for many of them.
const MIN_CAPACITY: u32 = 256;

/// Cloned wgpu handles held while a graphics context is attached. Device
/// and queue handles are internally reference counted, so the clones are
/// cheap and keep the context alive for as long as a store needs it.
#[derive(Clone)]
pub(crate) struct GpuLink {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
}

/// One growth step: double the capacity with a [`MIN_CAPACITY`] floor, or
/// jump straight past a request too large for doubling to cover. The new
/// free tail is always at least `request` elements, so a retried
/// allocation cannot fail regardless of fragmentation.
fn grown_capacity(capacity: u32, request: u32) -> u32 {
    (capacity * 2).max(MIN_CAPACITY).max(capacity + request)
}

#[cfg(test)]
mod tests {
    use super::grown_capacity;

    #[test]
    fn growth_starts_at_the_floor() {
        assert_eq!(grown_capacity(0, 4), 256);
        assert_eq!(grown_capacity(0, 200), 256);
    }

    #[test]
    fn growth_doubles_once_past_the_floor() {
        assert_eq!(grown_capacity(256, 10), 512);
        assert_eq!(grown_capacity(512, 512), 1024);
    }

    #[test]
    fn oversized_requests_grow_to_fit_in_one_step() {
        // Doubling 256 only frees 256 elements; a 1000-element request
        // must still succeed after a single growth.
        let new_capacity = grown_capacity(256, 1000);
        assert!(new_capacity - 256 >= 1000);
        assert_eq!(new_capacity, 1256);
    }
}
