//! Procedural chunk builders for common quadric and 2D shapes.
//!
//! Each builder allocates a chunk, fills it, and hands it back; the
//! caller owns the result and picks (via its pipeline) the topology the
//! builder was written for, noted per function.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::registry::ChunkRegistry;
use crate::signature::Signature;
use crate::vertex_chunk::VertexChunk;

/// An open-ended cylinder (or cone, when the radii differ) around +Z,
/// base at `z = 0`, for a triangle-strip pipeline.
///
/// The wall is one strip of `2 * (slices + 1)` vertices alternating
/// base and top rings, with the seam vertex repeated to close the loop.
/// Normals tilt with the radius difference, so cones shade correctly.
/// `slices == 0` yields an empty chunk.
#[must_use]
pub fn build_cylinder(
    registry: &mut ChunkRegistry,
    base_radius: f32,
    top_radius: f32,
    height: f32,
    slices: u32,
) -> VertexChunk {
    if slices == 0 {
        return VertexChunk::empty();
    }
    let delta_radius = base_radius - top_radius;
    let length = delta_radius.hypot(height);
    let z_normal = delta_radius / length;
    let xy_ratio = height / length;

    let count = 2 * (slices + 1) as usize;
    let mut vertices = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    for i in 0..=slices {
        let angle = 2.0 * PI * (i % slices) as f32 / slices as f32;
        let (sin, cos) = angle.sin_cos();
        let normal = Vec3::new(xy_ratio * sin, xy_ratio * cos, z_normal);
        normals.push(normal);
        normals.push(normal);
        vertices.push(Vec3::new(base_radius * sin, base_radius * cos, 0.0));
        vertices.push(Vec3::new(top_radius * sin, top_radius * cos, height));
    }

    let mut chunk = VertexChunk::new(registry, Signature::Vn, count as u32);
    chunk.write_vertices(&vertices);
    chunk.write_normals(&normals);
    chunk
}

/// A filled disk in the XY plane centered on the origin, for a
/// triangle-list pipeline: `3 * slices` vertices, one triangle per
/// slice, walking the rim once around from the +Y vertex.
#[must_use]
pub fn build_disk(
    registry: &mut ChunkRegistry,
    outer_radius: f32,
    slices: u32,
) -> VertexChunk {
    let mut rim = Vec::with_capacity(slices as usize + 1);
    rim.push(Vec3::new(0.0, outer_radius, 0.0));
    for i in (1..slices).rev() {
        let angle = 2.0 * PI * i as f32 / slices as f32;
        rim.push(Vec3::new(
            outer_radius * angle.sin(),
            outer_radius * angle.cos(),
            0.0,
        ));
    }
    rim.push(Vec3::new(0.0, outer_radius, 0.0));

    let center = Vec3::ZERO;
    let mut vertices = Vec::with_capacity(3 * slices as usize);
    for pair in rim.windows(2) {
        vertices.push(center);
        vertices.push(pair[0]);
        vertices.push(pair[1]);
    }

    let mut chunk =
        VertexChunk::new(registry, Signature::V, vertices.len() as u32);
    chunk.write_vertices(&vertices);
    chunk
}

/// A UV sphere centered on the origin, for a triangle-strip pipeline:
/// `slices` stacks of `slices` slices in one strip of
/// `2 * slices * (slices + 1)` vertices, built from the -Z pole up.
/// Texcoords wrap `s` once around and run `t` from 0 at the south pole
/// to 1 at the north.
#[must_use]
pub fn build_sphere(
    registry: &mut ChunkRegistry,
    radius: f32,
    slices: u32,
) -> VertexChunk {
    let count = 2 * slices as usize * (slices as usize + 1);
    let mut vertices = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    let mut texcoords = Vec::with_capacity(count);

    let mut z_low = -1.0_f32;
    let mut sin_low = 0.0_f32;
    let mut t_low = 0.0_f32;
    for j in (0..slices).rev() {
        let z_high = z_low;
        let sin_high = sin_low;
        let t_high = t_low;

        let percent = j as f32 / slices as f32;
        let angle_z = PI * percent;
        z_low = angle_z.cos();
        sin_low = angle_z.sin();
        t_low = 1.0 - percent;

        let mut emit = |tex: Vec2, normal: Vec3| {
            texcoords.push(tex);
            normals.push(normal);
            vertices.push(radius * normal);
        };

        emit(Vec2::new(1.0, t_high), Vec3::new(0.0, sin_high, z_high));
        emit(Vec2::new(1.0, t_low), Vec3::new(0.0, sin_low, z_low));
        for i in 1..slices {
            let angle = 2.0 * PI * i as f32 / slices as f32;
            let (sin, cos) = angle.sin_cos();
            let s = 1.0 - i as f32 / slices as f32;
            emit(
                Vec2::new(s, t_high),
                Vec3::new(sin * sin_high, cos * sin_high, z_high),
            );
            emit(
                Vec2::new(s, t_low),
                Vec3::new(sin * sin_low, cos * sin_low, z_low),
            );
        }
        emit(Vec2::new(0.0, t_high), Vec3::new(0.0, sin_high, z_high));
        emit(Vec2::new(0.0, t_low), Vec3::new(0.0, sin_low, z_low));
    }

    let mut chunk =
        VertexChunk::new(registry, Signature::Vtn, vertices.len() as u32);
    chunk.write_vertices(&vertices);
    chunk.write_normals(&normals);
    chunk.write_texcoords(&texcoords);
    chunk
}

/// A two-vertex segment for a line-list pipeline.
#[must_use]
pub fn build_line(
    registry: &mut ChunkRegistry,
    start: Vec3,
    end: Vec3,
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::V, 2);
    chunk.write_vertices(&[start, end]);
    chunk
}

/// A diamond in the XY plane for a triangle-strip pipeline, corners
/// `dim` away from `offset` along the axes.
#[must_use]
pub fn build_xy_diamond(
    registry: &mut ChunkRegistry,
    offset: Vec3,
    dim: f32,
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::V, 4);
    chunk.write_vertices(&[
        Vec3::new(0.0, -1.0, 0.0) * dim + offset,
        Vec3::new(1.0, 0.0, 0.0) * dim + offset,
        Vec3::new(-1.0, 0.0, 0.0) * dim + offset,
        Vec3::new(0.0, 1.0, 0.0) * dim + offset,
    ]);
    chunk
}

/// A left-pointing triangle in the XY plane for a triangle pipeline.
#[must_use]
pub fn build_left_triangle(
    registry: &mut ChunkRegistry,
    offset: Vec3,
    dim: f32,
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::V, 3);
    chunk.write_vertices(&[
        Vec3::new(0.0, -1.0, 0.0) * dim + offset,
        Vec3::new(0.0, 1.0, 0.0) * dim + offset,
        Vec3::new(-1.0, 0.0, 0.0) * dim + offset,
    ]);
    chunk
}

/// A right-pointing triangle in the XY plane for a triangle pipeline.
#[must_use]
pub fn build_right_triangle(
    registry: &mut ChunkRegistry,
    offset: Vec3,
    dim: f32,
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::V, 3);
    chunk.write_vertices(&[
        Vec3::new(0.0, -1.0, 0.0) * dim + offset,
        Vec3::new(1.0, 0.0, 0.0) * dim + offset,
        Vec3::new(0.0, 1.0, 0.0) * dim + offset,
    ]);
    chunk
}

/// A textured rectangle in the XZ plane (billboard style) for a
/// triangle-strip pipeline, spanning `[0, width]` by
/// `[base, base + height]`.
#[must_use]
pub fn build_tex_rect_xz(
    registry: &mut ChunkRegistry,
    width: f32,
    base: f32,
    height: f32,
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::Vt, 4);
    chunk.write_vertices(&[
        Vec3::new(0.0, 0.0, base),
        Vec3::new(width, 0.0, base),
        Vec3::new(0.0, 0.0, base + height),
        Vec3::new(width, 0.0, base + height),
    ]);
    chunk.write_texcoords(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ]);
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Attribute;

    fn position(registry: &ChunkRegistry, signature: Signature, index: u32) -> Vec3 {
        let store = registry.vertex_store(signature).unwrap();
        let store = store.borrow();
        let shadow = store.shadow(Attribute::Position).unwrap();
        let offset = index as usize * 3;
        Vec3::new(shadow[offset], shadow[offset + 1], shadow[offset + 2])
    }

    #[test]
    fn cylinder_is_a_closed_strip_with_unit_normals() {
        let mut registry = ChunkRegistry::new();
        let chunk = build_cylinder(&mut registry, 2.0, 1.0, 3.0, 16);
        assert_eq!(chunk.signature(), Some(Signature::Vn));
        assert_eq!(chunk.len(), 2 * 17);
        let start = chunk.start().unwrap();
        // Seam closes: first and last base-ring vertices coincide.
        let first = position(&registry, Signature::Vn, start);
        let last = position(&registry, Signature::Vn, start + chunk.len() - 2);
        assert!((first - last).length() < 1e-6);
        assert!((first - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);

        let store = registry.vertex_store(Signature::Vn).unwrap();
        let store = store.borrow();
        let normals = store.shadow(Attribute::Normal).unwrap();
        for i in 0..chunk.len() {
            let offset = (start + i) as usize * 3;
            let n = Vec3::new(
                normals[offset],
                normals[offset + 1],
                normals[offset + 2],
            );
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_slice_cylinder_is_the_empty_chunk() {
        let mut registry = ChunkRegistry::new();
        let chunk = build_cylinder(&mut registry, 1.0, 1.0, 2.0, 0);
        assert!(chunk.is_empty());
        assert!(registry.vertex_store(Signature::Vn).is_none());
    }

    #[test]
    fn disk_emits_one_triangle_per_slice() {
        let mut registry = ChunkRegistry::new();
        let chunk = build_disk(&mut registry, 1.5, 8);
        assert_eq!(chunk.signature(), Some(Signature::V));
        assert_eq!(chunk.len(), 3 * 8);
        let start = chunk.start().unwrap();
        // Every triangle starts at the center and rim vertices sit on
        // the circle.
        for tri in 0..8 {
            let center = position(&registry, Signature::V, start + tri * 3);
            assert!(center.length() < 1e-6);
            for corner in 1..3 {
                let v =
                    position(&registry, Signature::V, start + tri * 3 + corner);
                assert!((v.length() - 1.5).abs() < 1e-5);
                assert!(v.z.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn sphere_strip_spans_pole_to_pole() {
        let mut registry = ChunkRegistry::new();
        let chunk = build_sphere(&mut registry, 2.0, 8);
        assert_eq!(chunk.signature(), Some(Signature::Vtn));
        assert_eq!(chunk.len(), 2 * 8 * 9);
        let start = chunk.start().unwrap();
        let south = position(&registry, Signature::Vtn, start);
        assert!((south - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        let north =
            position(&registry, Signature::Vtn, start + chunk.len() - 1);
        assert!((north - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
        // All vertices lie on the sphere.
        for i in 0..chunk.len() {
            let v = position(&registry, Signature::Vtn, start + i);
            assert!((v.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn line_keeps_its_endpoints() {
        let mut registry = ChunkRegistry::new();
        let chunk = build_line(
            &mut registry,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 5.0, -6.0),
        );
        assert_eq!(chunk.len(), 2);
        let start = chunk.start().unwrap();
        assert_eq!(
            position(&registry, Signature::V, start),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            position(&registry, Signature::V, start + 1),
            Vec3::new(-4.0, 5.0, -6.0)
        );
    }

    #[test]
    fn diamond_scales_and_offsets_its_corners() {
        let mut registry = ChunkRegistry::new();
        let chunk =
            build_xy_diamond(&mut registry, Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert_eq!(chunk.len(), 4);
        let start = chunk.start().unwrap();
        assert_eq!(
            position(&registry, Signature::V, start),
            Vec3::new(10.0, -2.0, 0.0)
        );
        assert_eq!(
            position(&registry, Signature::V, start + 3),
            Vec3::new(10.0, 2.0, 0.0)
        );
    }
}
