//! Hand-checkable lookup tables.

use tilepal_core::math::Vec2;
use tilepal_render::{
    AttributeTable, ChainTables, GlyphBitmap, GlyphUv, PaletteTable, Rgba8, Size, SystemPalette,
    UnitPos,
};

/// The end-to-end scenario: raw index 5 at UV (0.2, 0.3), sub-palette 2 at
/// the same unit position, palette slot 13 holding color number 40.
pub mod scenario {
    use super::*;

    pub const UV: Vec2 = Vec2::new(0.2, 0.3);
    pub const RAW_INDEX: u8 = 5;
    pub const ATTRIBUTE: u8 = 2;
    /// `5 + 2 * 4`
    pub const PALETTE_SLOT: usize = 13;
    pub const PALETTE_ENTRY: u8 = 40;

    pub fn uv() -> GlyphUv {
        GlyphUv(UV)
    }

    pub fn unit_pos() -> UnitPos {
        UnitPos(UV)
    }

    /// Color the chain must produce at the scenario coordinates.
    pub fn expected_color() -> Rgba8 {
        ramp_color(PALETTE_ENTRY as u32)
    }

    /// Tables for the scenario. Laid out so a full-target quad, whose unit
    /// position equals its UV, hits the scenario texels at [`UV`].
    pub fn tables() -> ChainTables {
        // 10x10 bitmap: (0.2, 0.3) selects texel (2, 3)
        let mut glyphs = vec![0u8; 100];
        glyphs[3 * 10 + 2] = RAW_INDEX;

        // 2x2 attributes: the top-left quadrant uses sub-palette 2
        let attributes = vec![ATTRIBUTE, 0, 0, 1];

        let mut palette: Vec<u8> = (0..16u8).collect();
        palette[PALETTE_SLOT] = PALETTE_ENTRY;

        ChainTables {
            glyphs: GlyphBitmap::new(Size::new(10, 10), glyphs).expect("fixture table"),
            attributes: AttributeTable::new(Size::new(2, 2), attributes).expect("fixture table"),
            palette: PaletteTable::new(palette).expect("fixture table"),
            system: ramp_system_palette(),
        }
    }
}

/// Color `i` of [`ramp_system_palette`]. Every entry is distinct.
pub fn ramp_color(i: u32) -> Rgba8 {
    Rgba8::new((i * 4) as u8, 255 - (i * 4) as u8, (i * 37 % 256) as u8, 255)
}

/// A 64-entry system palette with distinct, predictable colors.
pub fn ramp_system_palette() -> SystemPalette {
    SystemPalette::new((0..64).map(ramp_color).collect::<Vec<_>>()).expect("fixture table")
}

/// Palette table where slot `i` holds color number `i * 3`.
pub fn stride_palette_table() -> PaletteTable {
    PaletteTable::new((0..16u8).map(|i| i * 3).collect::<Vec<_>>()).expect("fixture table")
}

/// Every glyph texel holds `raw`, every tile uses `attribute`.
pub fn uniform_tables(raw: u8, attribute: u8) -> ChainTables {
    ChainTables {
        glyphs: GlyphBitmap::new(Size::new(8, 8), vec![raw; 64]).expect("fixture table"),
        attributes: AttributeTable::uniform(Size::new(4, 4), attribute).expect("fixture table"),
        palette: stride_palette_table(),
        system: ramp_system_palette(),
    }
}

/// An 8x8 glyph whose texel `(x, y)` holds `(x + y) % 4`, with the
/// attribute table split into four quadrants using sub-palettes 0..=3.
pub fn diagonal_tables() -> ChainTables {
    let glyphs: Vec<u8> = (0..8u32)
        .flat_map(|y| (0..8u32).map(move |x| ((x + y) % 4) as u8))
        .collect();

    ChainTables {
        glyphs: GlyphBitmap::new(Size::new(8, 8), glyphs).expect("fixture table"),
        attributes: AttributeTable::new(Size::new(2, 2), vec![0u8, 1, 2, 3]).expect("fixture table"),
        palette: stride_palette_table(),
        system: ramp_system_palette(),
    }
}

/// Normalized coordinate of texel `(x, y)`'s center in a `size` table.
pub fn texel_center(x: u32, y: u32, size: Size<u32>) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / size.width as f32,
        (y as f32 + 0.5) / size.height as f32,
    )
}
