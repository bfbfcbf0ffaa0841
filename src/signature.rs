//! Vertex attribute signatures, attribute metadata, and primitive
//! topologies.
//!
//! A signature names the combination of per-vertex attributes a chunk
//! carries and therefore which backing store it lives in. Attribute slots,
//! shader locations, and buffer layouts are all derived from here so that
//! pipelines and chunk draws can never disagree about binding order.

/// One per-vertex attribute within a [`Signature`].
///
/// The declaration order is the binding order: present attributes occupy
/// consecutive vertex-buffer slots in this order, while shader locations
/// stay fixed per attribute regardless of signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// 3-component position. Present in every signature.
    Position,
    /// 2-component texture coordinate.
    Texcoord,
    /// 3-component normal.
    Normal,
    /// 4-component RGBA color.
    Color,
}

const POSITION_LAYOUT: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: 0,
}];
const TEXCOORD_LAYOUT: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: 1,
}];
const NORMAL_LAYOUT: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: 2,
}];
const COLOR_LAYOUT: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x4,
    offset: 0,
    shader_location: 3,
}];

impl Attribute {
    pub(crate) const COUNT: usize = 4;

    /// Every attribute, in binding order.
    pub(crate) const ALL: [Self; Self::COUNT] =
        [Self::Position, Self::Texcoord, Self::Normal, Self::Color];

    /// Number of `f32` components per element.
    #[must_use]
    pub const fn components(self) -> usize {
        match self {
            Self::Position | Self::Normal => 3,
            Self::Texcoord => 2,
            Self::Color => 4,
        }
    }

    /// Shader location, fixed across signatures so one shader interface
    /// can serve several of them.
    #[must_use]
    pub const fn shader_location(self) -> u32 {
        self as u32
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Texcoord => "texcoord",
            Self::Normal => "normal",
            Self::Color => "color",
        }
    }

    const fn layout_attributes(self) -> &'static [wgpu::VertexAttribute] {
        match self {
            Self::Position => &POSITION_LAYOUT,
            Self::Texcoord => &TEXCOORD_LAYOUT,
            Self::Normal => &NORMAL_LAYOUT,
            Self::Color => &COLOR_LAYOUT,
        }
    }
}

/// The attribute combination of a vertex chunk; selects its backing store.
///
/// `V` is position; `T`, `N`, `C` add texcoord, normal, and color. Each
/// variant has its own store, so two chunks share buffers exactly when
/// their signatures match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Position only.
    V,
    /// Position + color.
    Vc,
    /// Position + normal.
    Vn,
    /// Position + texcoord.
    Vt,
    /// Position + texcoord + normal.
    Vtn,
    /// Position + texcoord + color.
    Vtc,
    /// Position + texcoord + normal + color.
    Vtnc,
}

impl Signature {
    pub(crate) const COUNT: usize = 7;

    /// The attributes this signature carries, in binding order.
    #[must_use]
    pub const fn attributes(self) -> &'static [Attribute] {
        match self {
            Self::V => &[Attribute::Position],
            Self::Vc => &[Attribute::Position, Attribute::Color],
            Self::Vn => &[Attribute::Position, Attribute::Normal],
            Self::Vt => &[Attribute::Position, Attribute::Texcoord],
            Self::Vtn => {
                &[Attribute::Position, Attribute::Texcoord, Attribute::Normal]
            }
            Self::Vtc => {
                &[Attribute::Position, Attribute::Texcoord, Attribute::Color]
            }
            Self::Vtnc => &[
                Attribute::Position,
                Attribute::Texcoord,
                Attribute::Normal,
                Attribute::Color,
            ],
        }
    }

    /// Whether `attribute` is part of this signature.
    #[must_use]
    pub fn has(self, attribute: Attribute) -> bool {
        self.attributes().contains(&attribute)
    }

    /// Diagnostic name, e.g. `"VTN"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::V => "V",
            Self::Vc => "VC",
            Self::Vn => "VN",
            Self::Vt => "VT",
            Self::Vtn => "VTN",
            Self::Vtc => "VTC",
            Self::Vtnc => "VTNC",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Vertex buffer layouts for a pipeline that draws chunks of this
    /// signature, in the slot order used by chunk draws: one tightly
    /// packed buffer per attribute.
    #[must_use]
    pub fn buffer_layouts(self) -> Vec<wgpu::VertexBufferLayout<'static>> {
        self.attributes()
            .iter()
            .map(|attribute| wgpu::VertexBufferLayout {
                array_stride: (attribute.components() * size_of::<f32>())
                    as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attribute.layout_attributes(),
            })
            .collect()
    }
}

/// Primitive topology for pipelines that draw chunk ranges.
///
/// wgpu bakes topology into the render pipeline rather than the draw call,
/// so chunks never take a primitive argument; this enum exists to build
/// the pipelines those draws run under. GL's loop and fan topologies have
/// no wgpu equivalent: loops are stored closed (first vertex repeated) and
/// drawn as [`Self::LineStrip`], fans are emitted as [`Self::Triangles`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Isolated points.
    Points,
    /// Isolated line segments, two vertices each.
    Lines,
    /// Connected line segments.
    LineStrip,
    /// Isolated triangles, three vertices each.
    Triangles,
    /// Strip of triangles sharing edges.
    TriangleStrip,
}

impl Primitive {
    /// The matching wgpu topology for pipeline construction.
    #[must_use]
    pub const fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Self::Points => wgpu::PrimitiveTopology::PointList,
            Self::Lines => wgpu::PrimitiveTopology::LineList,
            Self::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Self::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Self::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_signature_starts_with_position() {
        for signature in [
            Signature::V,
            Signature::Vc,
            Signature::Vn,
            Signature::Vt,
            Signature::Vtn,
            Signature::Vtc,
            Signature::Vtnc,
        ] {
            assert_eq!(signature.attributes()[0], Attribute::Position);
            assert!(signature.has(Attribute::Position));
        }
    }

    #[test]
    fn attribute_order_matches_binding_order() {
        // Slot order within a signature must follow Attribute::ALL so that
        // store binds and buffer_layouts agree.
        for signature in [Signature::Vtn, Signature::Vtc, Signature::Vtnc] {
            let indices: Vec<usize> = signature
                .attributes()
                .iter()
                .map(|attribute| attribute.index())
                .collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            assert_eq!(indices, sorted, "{}", signature.label());
        }
    }

    #[test]
    fn layouts_use_packed_strides_and_fixed_locations() {
        let layouts = Signature::Vtnc.buffer_layouts();
        assert_eq!(layouts.len(), 4);
        assert_eq!(layouts[0].array_stride, 12);
        assert_eq!(layouts[1].array_stride, 8);
        assert_eq!(layouts[2].array_stride, 12);
        assert_eq!(layouts[3].array_stride, 16);
        for (layout, attribute) in
            layouts.iter().zip(Signature::Vtnc.attributes())
        {
            assert_eq!(
                layout.attributes[0].shader_location,
                attribute.shader_location()
            );
            assert_eq!(layout.attributes[0].offset, 0);
        }
    }

    #[test]
    fn color_only_signatures_skip_texcoord() {
        assert!(Signature::Vc.has(Attribute::Color));
        assert!(!Signature::Vc.has(Attribute::Texcoord));
        assert!(!Signature::Vn.has(Attribute::Color));
        assert_eq!(Signature::Vn.label(), "VN");
    }
}
