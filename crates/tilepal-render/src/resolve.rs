//! Color resolution stage.
//!
//! Two variants turn interpolated coordinates into a final color:
//!
//! - [`DirectSample`] returns a texel of one RGBA image unchanged;
//! - [`IndexedLookup`] walks the four-table chain
//!   glyph bitmap → attribute table → palette table → system palette.
//!
//! Both are pure functions of their inputs and the immutable tables they
//! hold, so one resolver can be shared by any number of threads.

use crate::color::{Color, Rgba8};
use crate::config::ChainConfig;
use crate::geometry::{GlyphUv, UnitPos};
use crate::indexing::{self, combined_index, palette_coordinate, recover_index};
use crate::sampler::TableSampler;
use crate::table::{AttributeTable, GlyphBitmap, PaletteTable, RgbaImage, SystemPalette};

/// Per-fragment color computation.
pub trait ColorResolver: Send + Sync {
    /// Compute the color for one fragment.
    ///
    /// `pos` is the forwarded unit-space position; variants that don't use
    /// it ignore it.
    fn resolve(&self, uv: GlyphUv, pos: UnitPos) -> Color;
}

/// Pass-through variant: the output is exactly the sampled texel.
#[derive(Debug, Clone)]
pub struct DirectSample {
    pub image: RgbaImage,
    pub sampler: TableSampler,
}

impl DirectSample {
    pub fn new(image: RgbaImage, sampler: TableSampler) -> Self {
        Self { image, sampler }
    }
}

impl ColorResolver for DirectSample {
    #[inline]
    fn resolve(&self, uv: GlyphUv, _pos: UnitPos) -> Color {
        self.sampler.sample_2d(&self.image, uv.0)
    }
}

/// The four tables of the lookup chain.
#[derive(Debug, Clone)]
pub struct ChainTables {
    pub glyphs: GlyphBitmap,
    pub attributes: AttributeTable,
    pub palette: PaletteTable,
    pub system: SystemPalette,
}

/// One sampler per table of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainSamplers {
    pub glyphs: TableSampler,
    pub attributes: TableSampler,
    pub palette: TableSampler,
    pub system: TableSampler,
}

impl From<&ChainConfig> for ChainSamplers {
    fn from(config: &ChainConfig) -> Self {
        Self {
            glyphs: TableSampler::new(config.glyph_address_mode),
            attributes: TableSampler::new(config.attribute_address_mode),
            palette: TableSampler::new(config.palette_address_mode),
            system: TableSampler::new(config.system_address_mode),
        }
    }
}

/// Every intermediate value of one trip through the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupTrace {
    pub raw_color_index: f32,
    pub attribute_offset: f32,
    pub combined_index: f32,
    pub palette_index: f32,
    pub color: Color,
}

/// Texels selected by the chain for one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSelection {
    /// Glyph bitmap texel `(x, y)`.
    pub glyph_texel: (usize, usize),
    /// Attribute table texel `(x, y)`.
    pub attribute_texel: (usize, usize),
    pub palette_slot: usize,
    pub system_entry: usize,
    pub color: Rgba8,
}

/// Indexed variant: resolves glyph color indices through the palette chain.
///
/// Out-of-range intermediate coordinates are never clamped here; the
/// sampler configured for the table being read decides what they select.
#[derive(Debug, Clone)]
pub struct IndexedLookup {
    tables: ChainTables,
    samplers: ChainSamplers,
}

impl IndexedLookup {
    pub fn new(tables: ChainTables, samplers: ChainSamplers) -> Self {
        if tables.palette.width() != indexing::COMBINED_SLOTS {
            tracing::debug!(
                "palette table has {} entries, combined index range is {}",
                tables.palette.width(),
                indexing::COMBINED_SLOTS
            );
        }
        if tables.system.width() != indexing::SYSTEM_PALETTE_SIZE {
            tracing::debug!(
                "system palette has {} entries, expected {}",
                tables.system.width(),
                indexing::SYSTEM_PALETTE_SIZE
            );
        }
        let lookup = Self { tables, samplers };
        if !lookup.is_exact() {
            tracing::warn!(
                "palette table of {} or system palette of {} entries exceeds {}/{}: \
                 select() may differ from trace() by one texel for out-of-range slots",
                lookup.tables.palette.width(),
                lookup.tables.system.width(),
                indexing::EXACT_PALETTE_WIDTH,
                indexing::EXACT_SYSTEM_WIDTH
            );
        }
        lookup
    }

    /// Whether [`select`](Self::select) is guaranteed to pick the same texels
    /// as [`trace`](Self::trace) for every stored byte.
    pub fn is_exact(&self) -> bool {
        self.tables.palette.width() <= indexing::EXACT_PALETTE_WIDTH
            && self.tables.system.width() <= indexing::EXACT_SYSTEM_WIDTH
    }

    pub fn from_config(tables: ChainTables, config: &ChainConfig) -> Self {
        Self::new(tables, ChainSamplers::from(config))
    }

    pub fn tables(&self) -> &ChainTables {
        &self.tables
    }

    pub fn samplers(&self) -> &ChainSamplers {
        &self.samplers
    }

    /// Run the chain and keep every intermediate value.
    pub fn trace(&self, uv: GlyphUv, pos: UnitPos) -> LookupTrace {
        let t = &self.tables;
        let s = &self.samplers;

        let raw_color_index = recover_index(s.glyphs.sample_2d(&t.glyphs, uv.0).r);
        let attribute_offset = recover_index(s.attributes.sample_2d(&t.attributes, pos.0).r);
        let combined_index = combined_index(raw_color_index, attribute_offset);
        let palette_index = palette_coordinate(s.palette.sample_1d(&t.palette, combined_index).r);
        let color = s.system.sample_1d(&t.system, palette_index);

        LookupTrace {
            raw_color_index,
            attribute_offset,
            combined_index,
            palette_index,
            color,
        }
    }

    /// Same selection as [`trace`](Self::trace), computed with integer
    /// arithmetic on the stored bytes. Exact while [`is_exact`](Self::is_exact)
    /// holds; see [`indexing`] for the bounds.
    pub fn select(&self, uv: GlyphUv, pos: UnitPos) -> IndexSelection {
        let t = &self.tables;
        let s = &self.samplers;

        let glyph_texel = s.glyphs.texel_index_2d(uv.0, t.glyphs.width(), t.glyphs.height());
        let attribute_texel =
            s.attributes
                .texel_index_2d(pos.0, t.attributes.width(), t.attributes.height());
        let raw = t.glyphs.texel(glyph_texel.0, glyph_texel.1);
        let attribute = t.attributes.texel(attribute_texel.0, attribute_texel.1);

        let palette_width = t.palette.width();
        let palette_slot = s
            .palette
            .address_mode_u
            .wrap_texel(indexing::palette_texel(raw, attribute, palette_width), palette_width);

        let entry = t.palette.texel(palette_slot);
        let system_width = t.system.width();
        let system_entry = s
            .system
            .address_mode_u
            .wrap_texel(indexing::system_texel(entry, system_width), system_width);

        IndexSelection {
            glyph_texel,
            attribute_texel,
            palette_slot,
            system_entry,
            color: t.system.texel(system_entry),
        }
    }

    /// Final color via the integer path.
    pub fn resolve_exact(&self, uv: GlyphUv, pos: UnitPos) -> Rgba8 {
        self.select(uv, pos).color
    }
}

impl ColorResolver for IndexedLookup {
    #[inline]
    fn resolve(&self, uv: GlyphUv, pos: UnitPos) -> Color {
        self.trace(uv, pos).color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::AddressMode;
    use tilepal_core::geometry::Size;

    fn ramp_palette() -> SystemPalette {
        let colors: Vec<Rgba8> = (0..64u32)
            .map(|i| Rgba8::new((i * 4) as u8, 255 - (i * 4) as u8, i as u8, 255))
            .collect();
        SystemPalette::new(colors).unwrap()
    }

    /// Glyph bitmap filled with `raw`, one attribute, identity-ish palette table.
    fn uniform_chain(raw: u8, attribute: u8) -> ChainTables {
        ChainTables {
            glyphs: GlyphBitmap::new(Size::new(8, 8), vec![raw; 64]).unwrap(),
            attributes: AttributeTable::uniform(Size::new(4, 4), attribute).unwrap(),
            palette: PaletteTable::new((0..16u8).map(|i| i * 3).collect::<Vec<_>>()).unwrap(),
            system: ramp_palette(),
        }
    }

    #[test]
    fn test_trace_scaling() {
        let lookup = IndexedLookup::new(uniform_chain(2, 1), ChainSamplers::default());
        let trace = lookup.trace(GlyphUv::new(0.5, 0.5), UnitPos::new(0.5, 0.5));

        assert!((trace.raw_color_index - 2.0 * 256.0 / 255.0).abs() < 1e-5);
        assert!((trace.attribute_offset - 256.0 / 255.0).abs() < 1e-5);
        assert!((trace.combined_index - 6.0 * 256.0 / 255.0 / 15.0).abs() < 1e-5);
        // slot 6 stores 18
        assert!((trace.palette_index - 18.0 / 255.0 * 4.0).abs() < 1e-5);
        assert_eq!(trace.color.to_rgba8(), Rgba8::new(72, 183, 18, 255));
    }

    #[test]
    fn test_float_and_integer_paths_agree_for_every_slot() {
        for attribute in 0..4u8 {
            for raw in 0..4u8 {
                let lookup = IndexedLookup::new(uniform_chain(raw, attribute), ChainSamplers::default());
                let uv = GlyphUv::new(0.3, 0.6);
                let pos = UnitPos::new(0.7, 0.1);
                let selection = lookup.select(uv, pos);
                assert_eq!(selection.palette_slot, (raw + attribute * 4) as usize);
                assert_eq!(lookup.resolve(uv, pos).to_rgba8(), selection.color);
            }
        }
    }

    #[test]
    fn test_wide_palette_tables_are_not_exact() {
        assert!(IndexedLookup::new(uniform_chain(0, 0), ChainSamplers::default()).is_exact());

        let mut tables = uniform_chain(0, 0);
        tables.palette = PaletteTable::new(vec![0u8; 313]).unwrap();
        assert!(!IndexedLookup::new(tables, ChainSamplers::default()).is_exact());

        let mut tables = uniform_chain(0, 0);
        tables.palette = PaletteTable::new(vec![0u8; indexing::EXACT_PALETTE_WIDTH as usize]).unwrap();
        assert!(IndexedLookup::new(tables, ChainSamplers::default()).is_exact());
    }

    #[test]
    fn test_select_matches_trace_at_width_bound() {
        let width = indexing::EXACT_PALETTE_WIDTH as usize;
        let mut tables = uniform_chain(0, 0);
        tables.palette = PaletteTable::new((0..width).map(|i| (i % 64) as u8).collect::<Vec<_>>()).unwrap();

        for raw in [0u8, 3, 15, 200, 233, 255] {
            for attribute in 0..4u8 {
                let mut chain = tables.clone();
                chain.glyphs = GlyphBitmap::new(Size::new(8, 8), vec![raw; 64]).unwrap();
                chain.attributes = AttributeTable::uniform(Size::new(4, 4), attribute).unwrap();
                let lookup = IndexedLookup::new(chain, ChainSamplers::default());
                let uv = GlyphUv::new(0.4, 0.4);
                let pos = UnitPos::new(0.4, 0.4);
                assert_eq!(
                    lookup.resolve(uv, pos).to_rgba8(),
                    lookup.resolve_exact(uv, pos),
                    "raw={raw} attribute={attribute}"
                );
            }
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let lookup = IndexedLookup::new(uniform_chain(1, 3), ChainSamplers::default());
        let uv = GlyphUv::new(0.2, 0.3);
        let pos = UnitPos::new(0.9, 0.4);
        let a = lookup.resolve(uv, pos);
        let b = lookup.resolve(uv, pos);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }

    #[test]
    fn test_last_slot_follows_palette_address_mode() {
        // raw 3 at sub-palette 3 lands one texel past a 16-entry table
        let clamped = IndexedLookup::new(uniform_chain(3, 3), ChainSamplers::default());
        assert_eq!(clamped.select(GlyphUv::default(), UnitPos::default()).palette_slot, 15);

        let samplers = ChainSamplers {
            palette: TableSampler::new(AddressMode::Repeat),
            ..Default::default()
        };
        let wrapped = IndexedLookup::new(uniform_chain(3, 3), samplers);
        let selection = wrapped.select(GlyphUv::default(), UnitPos::default());
        assert_eq!(selection.palette_slot, 0);
        assert_eq!(
            wrapped.resolve(GlyphUv::default(), UnitPos::default()).to_rgba8(),
            selection.color
        );
    }

    #[test]
    fn test_out_of_range_raw_index_flows_through() {
        // 255 at sub-palette 3 gives combined index 17.8 (unscaled); clamp pins it
        let lookup = IndexedLookup::new(uniform_chain(255, 3), ChainSamplers::default());
        let trace = lookup.trace(GlyphUv::default(), UnitPos::default());
        assert!(trace.combined_index > 1.0);
        assert_eq!(lookup.select(GlyphUv::default(), UnitPos::default()).palette_slot, 15);
    }

    #[test]
    fn test_attribute_uses_unit_position_not_uv() {
        let mut tables = uniform_chain(1, 0);
        // left half sub-palette 0, right half sub-palette 2
        tables.attributes =
            AttributeTable::new(Size::new(2, 1), vec![0u8, 2]).unwrap();
        let lookup = IndexedLookup::new(tables, ChainSamplers::default());

        let uv = GlyphUv::new(0.9, 0.5);
        let left = lookup.select(uv, UnitPos::new(0.25, 0.5));
        let right = lookup.select(uv, UnitPos::new(0.75, 0.5));
        assert_eq!(left.palette_slot, 1);
        assert_eq!(right.palette_slot, 9);
    }

    #[test]
    fn test_direct_sample_identity() {
        let texels: Vec<Rgba8> = (0..16u8).map(|i| Rgba8::new(i * 16, i, 255 - i, 200)).collect();
        let image = RgbaImage::new(Size::new(4, 4), texels.clone()).unwrap();
        let direct = DirectSample::new(image, TableSampler::clamp_to_edge());

        for y in 0..4 {
            for x in 0..4 {
                let uv = GlyphUv::new((x as f32 + 0.5) / 4.0, (y as f32 + 0.5) / 4.0);
                let color = direct.resolve(uv, UnitPos::default());
                assert_eq!(color, texels[y * 4 + x].to_color());
            }
        }
    }
}
