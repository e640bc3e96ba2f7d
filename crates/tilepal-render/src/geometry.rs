//! Geometry stage: unit-space quads to clip space.
//!
//! Vertices are authored in unit space, `[0, 1]²` with y pointing down like
//! texture rows. The stage maps them to clip space with a vertical flip and
//! forwards two separate coordinates to the color stage:
//!
//! - [`GlyphUv`] addresses the glyph bitmap (or the blit source);
//! - [`UnitPos`], the untransformed position, addresses the attribute table.
//!
//! The two are distinct types so one can't be passed where the other belongs.

use bytemuck::{Pod, Zeroable};
use tilepal_core::math::{PackedVec2, Vec2};

/// Position in unit space, `[0, 1]²`, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitPos(pub Vec2);

/// Texture coordinate into the glyph bitmap, `[0, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphUv(pub Vec2);

/// Clip-space position, `[-1, 1]²`, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipPos(pub Vec2);

impl UnitPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

impl GlyphUv {
    pub const fn new(u: f32, v: f32) -> Self {
        Self(Vec2::new(u, v))
    }
}

impl ClipPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// `clip = (pos - 0.5) * 2` with y negated.
#[inline]
pub fn to_clip(pos: UnitPos) -> ClipPos {
    let centered = (pos.0 - Vec2::splat(0.5)) * 2.0;
    ClipPos(Vec2::new(centered.x, -centered.y))
}

/// Inverse of [`to_clip`].
#[inline]
pub fn from_clip(clip: ClipPos) -> UnitPos {
    UnitPos(Vec2::new(clip.0.x, -clip.0.y) * 0.5 + Vec2::splat(0.5))
}

/// Vertex as uploaded to the GPU (`@location(0)` position, `@location(1)` uv).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CharVertex {
    pub position: PackedVec2,
    pub tex_coords: PackedVec2,
}

impl CharVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn new(pos: UnitPos, uv: GlyphUv) -> Self {
        Self {
            position: pos.0.into(),
            tex_coords: uv.0.into(),
        }
    }

    pub fn unit_pos(&self) -> UnitPos {
        UnitPos(self.position.into())
    }

    pub fn uv(&self) -> GlyphUv {
        GlyphUv(self.tex_coords.into())
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CharVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-vertex output of the geometry stage, interpolated per fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Varyings {
    pub clip: ClipPos,
    pub uv: GlyphUv,
    pub unit_pos: UnitPos,
}

impl Varyings {
    /// Barycentric blend of three vertex outputs.
    pub fn interpolate(v: &[Varyings; 3], weights: [f32; 3]) -> Self {
        let blend = |a: Vec2, b: Vec2, c: Vec2| a * weights[0] + b * weights[1] + c * weights[2];
        Self {
            clip: ClipPos(blend(v[0].clip.0, v[1].clip.0, v[2].clip.0)),
            uv: GlyphUv(blend(v[0].uv.0, v[1].uv.0, v[2].uv.0)),
            unit_pos: UnitPos(blend(v[0].unit_pos.0, v[1].unit_pos.0, v[2].unit_pos.0)),
        }
    }
}

/// Run the geometry stage for one vertex.
#[inline]
pub fn run_vertex(vertex: &CharVertex) -> Varyings {
    let unit_pos = vertex.unit_pos();
    Varyings {
        clip: to_clip(unit_pos),
        uv: vertex.uv(),
        unit_pos,
    }
}

/// Axis-aligned rectangle in unit space mapped onto a rectangle of glyph UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharQuad {
    /// Top-left corner in unit space.
    pub min: UnitPos,
    /// Bottom-right corner in unit space.
    pub max: UnitPos,
    pub uv_min: GlyphUv,
    pub uv_max: GlyphUv,
}

impl CharQuad {
    /// Quad covering the whole target, sampling the whole bitmap.
    pub fn fullscreen() -> Self {
        Self {
            min: UnitPos::new(0.0, 0.0),
            max: UnitPos::new(1.0, 1.0),
            uv_min: GlyphUv::new(0.0, 0.0),
            uv_max: GlyphUv::new(1.0, 1.0),
        }
    }

    /// Quad for one cell of a `columns x rows` grid, sampling cell
    /// `glyph` of an atlas laid out `atlas_columns x atlas_rows`.
    ///
    /// Returns `None` if the grid or the atlas has a zero dimension.
    pub fn cell(
        column: u32,
        row: u32,
        columns: u32,
        rows: u32,
        glyph: u32,
        atlas_columns: u32,
        atlas_rows: u32,
    ) -> Option<Self> {
        if columns == 0 || rows == 0 || atlas_columns == 0 || atlas_rows == 0 {
            return None;
        }

        let cell = Vec2::new(1.0 / columns as f32, 1.0 / rows as f32);
        let min = Vec2::new(column as f32, row as f32) * cell;

        let atlas_cell = Vec2::new(1.0 / atlas_columns as f32, 1.0 / atlas_rows as f32);
        let uv_min = Vec2::new((glyph % atlas_columns) as f32, (glyph / atlas_columns) as f32) * atlas_cell;

        Some(Self {
            min: UnitPos(min),
            max: UnitPos(min + cell),
            uv_min: GlyphUv(uv_min),
            uv_max: GlyphUv(uv_min + atlas_cell),
        })
    }

    /// Two counter-clockwise triangles (in clip space) covering the quad.
    pub fn vertices(&self) -> [CharVertex; 6] {
        let (x0, y0) = (self.min.0.x, self.min.0.y);
        let (x1, y1) = (self.max.0.x, self.max.0.y);
        let (u0, v0) = (self.uv_min.0.x, self.uv_min.0.y);
        let (u1, v1) = (self.uv_max.0.x, self.uv_max.0.y);

        let top_left = CharVertex::new(UnitPos::new(x0, y0), GlyphUv::new(u0, v0));
        let top_right = CharVertex::new(UnitPos::new(x1, y0), GlyphUv::new(u1, v0));
        let bottom_left = CharVertex::new(UnitPos::new(x0, y1), GlyphUv::new(u0, v1));
        let bottom_right = CharVertex::new(UnitPos::new(x1, y1), GlyphUv::new(u1, v1));

        [
            bottom_left,
            bottom_right,
            top_right,
            bottom_left,
            top_right,
            top_left,
        ]
    }
}
