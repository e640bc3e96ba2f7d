//! Normalized-coordinate sampling over lookup tables.
//!
//! Every table in the lookup chain is read with nearest filtering. A
//! normalized coordinate `u` selects texel `floor(u * width)`; the address
//! mode then decides what happens when that texel falls outside the table.
//! The same rules drive the GPU samplers created for each table, so the CPU
//! path and the shader select the same texels.

use tilepal_core::math::Vec2;

use crate::color::Color;
use crate::table::{LookupTable1d, LookupTable2d, Texel};

/// Boundary policy for texel selection outside `0..width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Out-of-range texels snap to the nearest edge texel.
    #[default]
    ClampToEdge,
    /// The table tiles infinitely.
    Repeat,
    /// The table tiles infinitely, every other copy mirrored.
    MirrorRepeat,
}

impl AddressMode {
    /// Map an unbounded texel coordinate into `0..width`.
    ///
    /// `width` must be non-zero; tables enforce this at construction.
    pub fn wrap_texel(self, texel: i64, width: u32) -> usize {
        let width = i64::from(width);
        let wrapped = match self {
            AddressMode::ClampToEdge => texel.clamp(0, width - 1),
            AddressMode::Repeat => texel.rem_euclid(width),
            AddressMode::MirrorRepeat => {
                let m = texel.rem_euclid(2 * width);
                if m >= width { 2 * width - 1 - m } else { m }
            }
        };
        wrapped as usize
    }

    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Unbounded texel coordinate selected by a normalized coordinate.
///
/// Non-finite inputs select texel 0 rather than poisoning the index.
#[inline]
pub fn unwrapped_texel(u: f32, width: u32) -> i64 {
    let t = (u * width as f32).floor();
    if t.is_finite() { t as i64 } else { 0 }
}

/// Nearest-filtering sampler with a per-axis address mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TableSampler {
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
}

impl TableSampler {
    /// Sampler using the same address mode on both axes.
    pub const fn new(mode: AddressMode) -> Self {
        Self {
            address_mode_u: mode,
            address_mode_v: mode,
        }
    }

    pub const fn clamp_to_edge() -> Self {
        Self::new(AddressMode::ClampToEdge)
    }

    pub const fn repeat() -> Self {
        Self::new(AddressMode::Repeat)
    }

    /// Texel index selected along the u axis of a table `width` texels wide.
    #[inline]
    pub fn texel_index(&self, u: f32, width: u32) -> usize {
        self.address_mode_u.wrap_texel(unwrapped_texel(u, width), width)
    }

    /// Texel `(x, y)` selected by a 2D normalized coordinate.
    #[inline]
    pub fn texel_index_2d(&self, uv: Vec2, width: u32, height: u32) -> (usize, usize) {
        let x = self.address_mode_u.wrap_texel(unwrapped_texel(uv.x, width), width);
        let y = self.address_mode_v.wrap_texel(unwrapped_texel(uv.y, height), height);
        (x, y)
    }

    /// Sample a 1D table at normalized coordinate `u`.
    pub fn sample_1d<T: Texel>(&self, table: &LookupTable1d<T>, u: f32) -> Color {
        table.texel(self.texel_index(u, table.width())).normalized()
    }

    /// Sample a 2D table at normalized coordinate `uv`.
    pub fn sample_2d<T: Texel>(&self, table: &LookupTable2d<T>, uv: Vec2) -> Color {
        let (x, y) = self.texel_index_2d(uv, table.width(), table.height());
        table.texel(x, y).normalized()
    }

    /// Descriptor for the equivalent GPU sampler.
    pub fn to_descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode_u.to_wgpu(),
            address_mode_v: self.address_mode_v.to_wgpu(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }
    }
}
