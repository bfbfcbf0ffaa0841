// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code (invariant violations use assert!, which is
// the deliberate abort path for bookkeeping corruption)
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU / graphics allowances — casts between index widths are intentional
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

//! Sub-allocated, growable GPU vertex/index buffer pools built on wgpu.
//!
//! A real-time renderer creates and destroys thousands of small geometry
//! chunks per session. Giving each its own `wgpu::Buffer` wastes memory and
//! drowns the driver in bind calls, so this crate packs them into a handful
//! of large shared buffers: one set of attribute buffers per vertex
//! [`Signature`] plus one shared index buffer. Each chunk owns a stable
//! contiguous element range for its lifetime.
//!
//! # Key entry points
//!
//! - [`ChunkRegistry`] - signature-keyed cache of backing stores and the
//!   graphics-context attach/detach point
//! - [`VertexChunk`] / [`ElementChunk`] - move-only handles over
//!   sub-allocated buffer ranges
//! - [`ChunkBatch`] - multi-range draw snapshot over chunks sharing one
//!   backing store
//! - [`geometry`] / [`drawing`] - mesh builders and prebuilt unit shapes
//!
//! # Architecture
//!
//! Handles allocate through a free-list region allocator with
//! adjacent-block coalescing. Every store keeps CPU shadow arrays mirroring
//! GPU contents, so buffers can grow by copy-and-reupload and survive a
//! graphics-context loss without reading anything back from the GPU. All
//! operations are synchronous and assume the thread that owns the GPU
//! queue; nothing here locks. The region allocator and the backing stores
//! are internal; callers only see registries, handles, and batches.

pub mod batch;
pub mod drawing;
pub mod element_chunk;
pub mod error;
pub mod geometry;
mod region;
pub mod registry;
pub mod signature;
mod store;
pub mod vertex_chunk;

pub use batch::ChunkBatch;
pub use drawing::ShapeCache;
pub use element_chunk::ElementChunk;
pub use error::ChunkError;
pub use registry::ChunkRegistry;
pub use signature::{Attribute, Primitive, Signature};
pub use vertex_chunk::VertexChunk;
