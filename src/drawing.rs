//! A cache of small prebuilt shapes the renderer draws constantly:
//! unit rects, loops, crosshairs, beams, spheres and cylinders at a few
//! fixed tessellations.
//!
//! Building these once and re-drawing them beats re-uploading a handful
//! of vertices every frame. The cache is an explicit object the renderer
//! owns next to its [`ChunkRegistry`]; constructing a second one just
//! wastes memory, nothing breaks.
//!
//! Topology comes from the caller's pipeline, so each method notes the
//! topology its data was built for. Closed outlines carry an explicit
//! repeated vertex and expect a line-strip pipeline.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::geometry;
use crate::registry::ChunkRegistry;
use crate::signature::Signature;
use crate::vertex_chunk::VertexChunk;

const OUTLINE_SIDES: u32 = 20;

/// Prebuilt unit shapes, allocated once from a registry.
pub struct ShapeCache {
    symmetric_square_loop: VertexChunk,
    asymmetric_square_loop: VertexChunk,
    diamond_loop: VertexChunk,
    diamond_textured_xz: VertexChunk,
    diamond_textured_xy: VertexChunk,
    asymmetric_line_x: VertexChunk,
    asymmetric_line_y: VertexChunk,
    symmetric_line_x: VertexChunk,
    symmetric_line_y: VertexChunk,
    cross: VertexChunk,
    north: VertexChunk,
    symmetric_rect: VertexChunk,
    asymmetric_rect: VertexChunk,
    asymmetric_rect_xz: VertexChunk,
    symmetric_textured_rect: VertexChunk,
    symmetric_textured_rect_xz: VertexChunk,
    asymmetric_textured_rect: VertexChunk,
    vertical_textured_rect: VertexChunk,
    isosceles_triangle_xy: VertexChunk,
    triangle: VertexChunk,
    shot_line: VertexChunk,
    view_angle: VertexChunk,
    outline_circle: VertexChunk,
    spheres: [VertexChunk; 5],
    cylinders_x: [VertexChunk; 4],
    beam: VertexChunk,
}

impl ShapeCache {
    /// Build every shape. One allocation burst; everything after is
    /// draw calls only.
    #[must_use]
    pub fn new(registry: &mut ChunkRegistry) -> Self {
        Self {
            symmetric_square_loop: loop_chunk(
                registry,
                &[
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                ],
            ),
            asymmetric_square_loop: loop_chunk(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
            ),
            diamond_loop: loop_chunk(
                registry,
                &[
                    Vec3::new(-1.0, 0.0, 0.0),
                    Vec3::new(0.0, -1.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
            ),
            diamond_textured_xz: textured_quad(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(1.0, 0.0, 1.0),
                    Vec3::new(0.0, 0.0, -1.0),
                    Vec3::new(1.0, 0.0, -1.0),
                ],
                &[
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, 1.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(1.0, 1.0),
                ],
            ),
            diamond_textured_xy: textured_quad(
                registry,
                &[
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(0.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                ],
                &[
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, 1.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(1.0, 1.0),
                ],
            ),
            asymmetric_line_x: geometry::build_line(registry, Vec3::ZERO, Vec3::X),
            asymmetric_line_y: geometry::build_line(registry, Vec3::ZERO, Vec3::Y),
            symmetric_line_x: geometry::build_line(registry, Vec3::NEG_X, Vec3::X),
            symmetric_line_y: geometry::build_line(registry, Vec3::NEG_Y, Vec3::Y),
            cross: plain_chunk(
                registry,
                &[
                    Vec3::new(-1.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, -1.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
            ),
            north: plain_chunk(
                registry,
                &[
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
            ),
            symmetric_rect: plain_chunk(
                registry,
                &[
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
            ),
            asymmetric_rect: plain_chunk(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
            ),
            asymmetric_rect_xz: plain_chunk(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(1.0, 0.0, 1.0),
                ],
            ),
            symmetric_textured_rect: textured_quad(
                registry,
                &[
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
                &UNIT_TEXCOORDS,
            ),
            symmetric_textured_rect_xz: textured_quad(
                registry,
                &[
                    Vec3::new(-1.0, 0.0, -1.0),
                    Vec3::new(1.0, 0.0, -1.0),
                    Vec3::new(-1.0, 0.0, 1.0),
                    Vec3::new(1.0, 0.0, 1.0),
                ],
                &UNIT_TEXCOORDS,
            ),
            asymmetric_textured_rect: textured_quad(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
                &UNIT_TEXCOORDS,
            ),
            vertical_textured_rect: textured_quad(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(0.0, 1.0, 1.0),
                    Vec3::new(0.0, 0.0, -1.0),
                    Vec3::new(0.0, 1.0, -1.0),
                ],
                &[
                    Vec2::new(0.0, 1.0),
                    Vec2::new(0.0, 0.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(1.0, 0.0),
                ],
            ),
            isosceles_triangle_xy: loop_chunk(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(0.0, 2.0, 0.0),
                ],
            ),
            triangle: plain_chunk(
                registry,
                &[
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(-1.0, 1.0, 1.0),
                ],
            ),
            shot_line: plain_chunk(
                registry,
                &[
                    Vec3::ZERO,
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::ZERO,
                    Vec3::new(-1.0, -1.0, 0.0),
                ],
            ),
            view_angle: plain_chunk(
                registry,
                &[
                    Vec3::new(-1.0, 1.0, 0.0),
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
            ),
            outline_circle: build_outline_circle(registry),
            spheres: [4, 6, 8, 16, 32]
                .map(|slices| geometry::build_sphere(registry, 1.0, slices)),
            cylinders_x: [10, 16, 24, 32]
                .map(|slices| build_cylinder_around_x(registry, slices)),
            beam: build_beam(registry),
        }
    }

    /// Unit square outline around the origin; line-strip pipeline.
    pub fn symmetric_square_loop(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_square_loop.draw(pass);
    }

    /// Unit square outline with one corner at the origin; line-strip
    /// pipeline.
    pub fn asymmetric_square_loop(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_square_loop.draw(pass);
    }

    /// Diamond outline around the origin; line-strip pipeline.
    pub fn diamond_loop(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.diamond_loop.draw(pass);
    }

    /// Textured XZ quad with diamond-rotated texcoords; triangle-strip
    /// pipeline.
    pub fn diamond_textured_xz(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.diamond_textured_xz.draw(pass);
    }

    /// Textured XY quad with diamond-rotated texcoords; triangle-strip
    /// pipeline.
    pub fn diamond_textured_xy(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.diamond_textured_xy.draw(pass);
    }

    /// Unit segment from the origin along +X; line-list pipeline.
    pub fn asymmetric_line_x(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_line_x.draw(pass);
    }

    /// Unit segment from the origin along +Y; line-list pipeline.
    pub fn asymmetric_line_y(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_line_y.draw(pass);
    }

    /// Segment from -X to +X; line-list pipeline.
    pub fn symmetric_line_x(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_line_x.draw(pass);
    }

    /// Segment from -Y to +Y; line-list pipeline.
    pub fn symmetric_line_y(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_line_y.draw(pass);
    }

    /// Two crossing unit segments; line-list pipeline.
    pub fn cross(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.cross.draw(pass);
    }

    /// An "N" glyph; line-strip pipeline.
    pub fn north(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.north.draw(pass);
    }

    /// Filled unit rect around the origin; triangle-strip pipeline.
    pub fn symmetric_rect(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_rect.draw(pass);
    }

    /// Filled unit rect with one corner at the origin; triangle-strip
    /// pipeline.
    pub fn asymmetric_rect(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_rect.draw(pass);
    }

    /// Filled unit rect in the XZ plane; triangle-strip pipeline.
    pub fn asymmetric_rect_xz(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_rect_xz.draw(pass);
    }

    /// Textured unit rect around the origin; triangle-strip pipeline.
    pub fn symmetric_textured_rect(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_textured_rect.draw(pass);
    }

    /// Textured unit rect in the XZ plane; triangle-strip pipeline.
    pub fn symmetric_textured_rect_xz(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.symmetric_textured_rect_xz.draw(pass);
    }

    /// Textured unit rect with one corner at the origin; triangle-strip
    /// pipeline.
    pub fn asymmetric_textured_rect(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.asymmetric_textured_rect.draw(pass);
    }

    /// Textured unit rect in the YZ plane; triangle-strip pipeline.
    pub fn vertical_textured_rect(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.vertical_textured_rect.draw(pass);
    }

    /// Filled isosceles triangle in XY; triangle-list pipeline.
    pub fn isosceles_triangle_xy_filled(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.isosceles_triangle_xy.draw_range(pass, 3, 0);
    }

    /// Outline of the isosceles triangle; line-strip pipeline.
    pub fn isosceles_triangle_xy_outline(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.isosceles_triangle_xy.draw(pass);
    }

    /// Filled marker triangle at z = 1; triangle-list pipeline.
    pub fn triangle_filled(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.triangle.draw(pass);
    }

    /// Open outline of the marker triangle; line-strip pipeline.
    pub fn triangle_outline(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.triangle.draw(pass);
    }

    /// A single point at the origin; point-list pipeline.
    pub fn point(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.shot_line.draw_range(pass, 1, 0);
    }

    /// Trailing half of the shot tracer; line-list pipeline.
    pub fn lagging_line(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.shot_line.draw_range(pass, 2, 2);
    }

    /// Leading half of the shot tracer; line-list pipeline.
    pub fn leading_line(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.shot_line.draw_range(pass, 2, 0);
    }

    /// Both halves of the shot tracer; line-list pipeline.
    pub fn leadlag_line(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.shot_line.draw(pass);
    }

    /// Radar view-angle wedge; line-strip pipeline.
    pub fn view_angle(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.view_angle.draw(pass);
    }

    /// 20-sided unit circle outline; line-strip pipeline.
    pub fn outlined_circle(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.outline_circle.draw(pass);
    }

    /// Unit sphere at the coarsest tessellation of at least `slices`
    /// (4, 6, 8, 16, or 32); triangle-strip pipeline.
    pub fn sphere(&self, pass: &mut wgpu::RenderPass<'_>, slices: u32) {
        let pick = match slices {
            0..=4 => 0,
            5..=6 => 1,
            7..=8 => 2,
            9..=16 => 3,
            _ => 4,
        };
        self.spheres[pick].draw(pass);
    }

    /// Unit cylinder along +X at the coarsest tessellation of at least
    /// `slices` (10, 16, 24, or 32); triangle-strip pipeline.
    pub fn cylinder_x(&self, pass: &mut wgpu::RenderPass<'_>, slices: u32) {
        let pick = match slices {
            0..=10 => 0,
            11..=16 => 1,
            17..=24 => 2,
            _ => 3,
        };
        self.cylinders_x[pick].draw(pass);
    }

    /// Hexagonal beam along +X; triangle-strip pipeline.
    pub fn beam(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.beam.draw(pass);
    }
}

const UNIT_TEXCOORDS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
];

fn plain_chunk(registry: &mut ChunkRegistry, vertices: &[Vec3]) -> VertexChunk {
    let mut chunk =
        VertexChunk::new(registry, Signature::V, vertices.len() as u32);
    chunk.write_vertices(vertices);
    chunk
}

/// A closed outline: the first vertex is repeated at the end so a
/// line-strip pipeline draws a loop.
fn loop_chunk(registry: &mut ChunkRegistry, vertices: &[Vec3]) -> VertexChunk {
    let mut closed = Vec::with_capacity(vertices.len() + 1);
    closed.extend_from_slice(vertices);
    closed.push(vertices[0]);
    plain_chunk(registry, &closed)
}

fn textured_quad(
    registry: &mut ChunkRegistry,
    vertices: &[Vec3; 4],
    texcoords: &[Vec2; 4],
) -> VertexChunk {
    let mut chunk = VertexChunk::new(registry, Signature::Vt, 4);
    chunk.write_vertices(vertices);
    chunk.write_texcoords(texcoords);
    chunk
}

fn build_outline_circle(registry: &mut ChunkRegistry) -> VertexChunk {
    let mut vertices = Vec::with_capacity(OUTLINE_SIDES as usize + 1);
    for i in 0..=OUTLINE_SIDES {
        let angle = 2.0 * PI * (i % OUTLINE_SIDES) as f32 / OUTLINE_SIDES as f32;
        vertices.push(Vec3::new(angle.cos(), angle.sin(), 0.0));
    }
    plain_chunk(registry, &vertices)
}

/// Unit-radius cylinder wall along +X from `x = 0` to `x = 1`, one
/// strip of `2 * (slices + 1)` vertices with radial normals. An empty
/// chunk for `slices == 0`.
fn build_cylinder_around_x(
    registry: &mut ChunkRegistry,
    slices: u32,
) -> VertexChunk {
    if slices == 0 {
        return VertexChunk::empty();
    }
    let count = 2 * (slices + 1) as usize;
    let mut vertices = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    for i in 0..=slices {
        let angle = 2.0 * PI * (i % slices) as f32 / slices as f32;
        let (sin, cos) = angle.sin_cos();
        let radial = Vec3::new(0.0, sin, cos);
        normals.push(radial);
        normals.push(radial);
        vertices.push(radial);
        vertices.push(Vec3::new(1.0, sin, cos));
    }
    let mut chunk = VertexChunk::new(registry, Signature::Vn, count as u32);
    chunk.write_vertices(&vertices);
    chunk.write_normals(&normals);
    chunk
}

/// Hexagonal prism wall along +X: six segments plus the closing pair,
/// 14 strip vertices.
fn build_beam(registry: &mut ChunkRegistry) -> VertexChunk {
    let mut vertices = Vec::with_capacity(14);
    for i in 0..=6 {
        let angle = 2.0 * PI * (i % 6) as f32 / 6.0;
        let rim = Vec3::new(0.0, -angle.cos(), angle.sin());
        vertices.push(rim);
        vertices.push(Vec3::new(1.0, rim.y, rim.z));
    }
    plain_chunk(registry, &vertices)
}
