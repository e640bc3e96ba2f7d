//! Table builders for NES-style picture data.
//!
//! The lookup chain mirrors the NES background path: 2-bit pattern pixels,
//! a 2-bit attribute per 16x16 pixel area, 32 bytes of palette RAM holding
//! 6-bit color numbers, and the 64-color master palette of the 2C02.

use tilepal_core::geometry::Size;

use crate::color::Rgba8;
use crate::indexing::{COMBINED_SLOTS, SLOTS_PER_SUB_PALETTE, SYSTEM_PALETTE_SIZE};
use crate::table::{AttributeTable, GlyphBitmap, PaletteTable, SystemPalette, TableError};

/// Bytes per 8x8 two-plane CHR tile.
pub const CHR_TILE_BYTES: usize = 16;

/// Tile edge in pixels.
pub const TILE_SIZE: u32 = 8;

/// Tiles per row of a decoded CHR atlas, matching one pattern table.
pub const ATLAS_COLUMNS: u32 = 16;

/// Nametable dimensions in tiles.
pub const NAMETABLE_SIZE: Size<u32> = Size::new(32, 30);

/// Attribute bytes per nametable (8x8 grid, each covering 4x4 tiles).
pub const ATTRIBUTE_BYTES: usize = 64;

const COLOR_MASK: u8 = (SYSTEM_PALETTE_SIZE - 1) as u8;

/// 2C02 master palette.
pub const NES_SYSTEM_PALETTE: [Rgba8; SYSTEM_PALETTE_SIZE as usize] = [
    Rgba8::from_hex(0x666666), Rgba8::from_hex(0x002A88), Rgba8::from_hex(0x1412A7), Rgba8::from_hex(0x3B00A4),
    Rgba8::from_hex(0x5C007E), Rgba8::from_hex(0x6E0040), Rgba8::from_hex(0x6C0600), Rgba8::from_hex(0x561D00),
    Rgba8::from_hex(0x333500), Rgba8::from_hex(0x0B4800), Rgba8::from_hex(0x005200), Rgba8::from_hex(0x004F08),
    Rgba8::from_hex(0x00404D), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000),
    Rgba8::from_hex(0xADADAD), Rgba8::from_hex(0x155FD9), Rgba8::from_hex(0x4240FF), Rgba8::from_hex(0x7527FE),
    Rgba8::from_hex(0xA01ACC), Rgba8::from_hex(0xB71E7B), Rgba8::from_hex(0xB53120), Rgba8::from_hex(0x994E00),
    Rgba8::from_hex(0x6B6D00), Rgba8::from_hex(0x388700), Rgba8::from_hex(0x0C9300), Rgba8::from_hex(0x008F32),
    Rgba8::from_hex(0x007C8D), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000),
    Rgba8::from_hex(0xFFFEFF), Rgba8::from_hex(0x64B0FF), Rgba8::from_hex(0x9290FF), Rgba8::from_hex(0xC676FF),
    Rgba8::from_hex(0xF36AFF), Rgba8::from_hex(0xFE6ECC), Rgba8::from_hex(0xFE8170), Rgba8::from_hex(0xEA9E22),
    Rgba8::from_hex(0xBCBE00), Rgba8::from_hex(0x88D800), Rgba8::from_hex(0x5CE430), Rgba8::from_hex(0x45E082),
    Rgba8::from_hex(0x48CDDE), Rgba8::from_hex(0x4F4F4F), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000),
    Rgba8::from_hex(0xFFFEFF), Rgba8::from_hex(0xC0DFFF), Rgba8::from_hex(0xD3D2FF), Rgba8::from_hex(0xE8C8FF),
    Rgba8::from_hex(0xFBC2FF), Rgba8::from_hex(0xFEC4EA), Rgba8::from_hex(0xFECCC5), Rgba8::from_hex(0xF7D8A5),
    Rgba8::from_hex(0xE4E594), Rgba8::from_hex(0xCFEF96), Rgba8::from_hex(0xBDF4AB), Rgba8::from_hex(0xB3F3CC),
    Rgba8::from_hex(0xB5EBF2), Rgba8::from_hex(0xB8B8B8), Rgba8::from_hex(0x000000), Rgba8::from_hex(0x000000),
];

impl SystemPalette {
    /// The 64-color 2C02 master palette.
    pub fn nes() -> Self {
        SystemPalette::new(NES_SYSTEM_PALETTE).expect("NES palette has 64 entries")
    }
}

/// Decode planar 2bpp CHR data into a glyph atlas, 16 tiles per row.
///
/// Each texel holds the pixel's 2-bit color number. Tiles missing from the
/// last atlas row are left at 0.
pub fn decode_chr_tiles(chr: &[u8]) -> Result<GlyphBitmap, TableError> {
    if chr.is_empty() {
        return Err(TableError::Empty);
    }
    if chr.len() % CHR_TILE_BYTES != 0 {
        return Err(TableError::PartialTile {
            len: chr.len(),
            tile_bytes: CHR_TILE_BYTES,
        });
    }

    let tile_count = (chr.len() / CHR_TILE_BYTES) as u32;
    let rows = tile_count.div_ceil(ATLAS_COLUMNS);
    let size = Size::new(ATLAS_COLUMNS * TILE_SIZE, rows * TILE_SIZE);
    let mut texels = vec![0u8; size.area()];

    for (tile, bytes) in chr.chunks_exact(CHR_TILE_BYTES).enumerate() {
        let tile = tile as u32;
        let origin_x = (tile % ATLAS_COLUMNS) * TILE_SIZE;
        let origin_y = (tile / ATLAS_COLUMNS) * TILE_SIZE;
        let (low, high) = bytes.split_at(TILE_SIZE as usize);

        for row in 0..TILE_SIZE {
            let lo = low[row as usize];
            let hi = high[row as usize];
            for col in 0..TILE_SIZE {
                let bit = 7 - col;
                let pixel = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
                let x = origin_x + col;
                let y = origin_y + row;
                texels[(y * size.width + x) as usize] = pixel;
            }
        }
    }

    tracing::debug!("decoded {} CHR tiles into a {}x{} atlas", tile_count, size.width, size.height);
    GlyphBitmap::new(size, texels)
}

/// Expand a nametable's 64 attribute bytes into one sub-palette per tile.
///
/// Each byte covers 4x4 tiles; its four 2-bit fields select the palette of
/// the top-left, top-right, bottom-left and bottom-right 2x2 quadrants.
pub fn expand_attribute_bytes(attributes: &[u8; ATTRIBUTE_BYTES]) -> AttributeTable {
    let size = NAMETABLE_SIZE;
    let mut offsets = Vec::with_capacity(size.area());

    for tile_y in 0..size.height {
        for tile_x in 0..size.width {
            let byte = attributes[((tile_y / 4) * 8 + tile_x / 4) as usize];
            let shift = ((tile_y & 0x02) << 1) | (tile_x & 0x02);
            offsets.push((byte >> shift) & 0x03);
        }
    }

    AttributeTable::new(size, offsets).expect("one offset per nametable tile")
}

/// Background palette table from 32 bytes of palette RAM.
///
/// Entries keep their low 6 bits. Color 0 of every sub-palette reads the
/// shared backdrop at `$3F00`, as the PPU does for transparent pixels.
pub fn palette_ram_table(ram: &[u8; 32]) -> PaletteTable {
    let backdrop = ram[0] & COLOR_MASK;
    let entries: Vec<u8> = (0..COMBINED_SLOTS as usize)
        .map(|slot| {
            if slot % SLOTS_PER_SUB_PALETTE as usize == 0 {
                backdrop
            } else {
                ram[slot] & COLOR_MASK
            }
        })
        .collect();

    PaletteTable::new(entries).expect("palette table has 16 entries")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plane 0 is a diagonal, plane 1 the outer columns.
    fn sample_tile() -> [u8; CHR_TILE_BYTES] {
        [
            0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01, // plane 0
            0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, // plane 1
        ]
    }

    #[test]
    fn test_decode_single_tile() {
        let atlas = decode_chr_tiles(&sample_tile()).unwrap();
        assert_eq!(atlas.size(), Size::new(128, 8));
        // diagonal + column overlap at (0,0): both planes set
        assert_eq!(atlas.texel(0, 0), 3);
        // plane 1 only
        assert_eq!(atlas.texel(7, 0), 2);
        // plane 0 only
        assert_eq!(atlas.texel(3, 3), 1);
        assert_eq!(atlas.texel(3, 4), 0);
        // outside the decoded tile
        assert_eq!(atlas.texel(8, 0), 0);
    }

    #[test]
    fn test_decode_places_tiles_in_rows_of_sixteen() {
        let mut chr = vec![0u8; CHR_TILE_BYTES * 17];
        // tile 16 starts the second row; give it a solid plane 0
        chr[16 * CHR_TILE_BYTES..16 * CHR_TILE_BYTES + 8].fill(0xFF);
        let atlas = decode_chr_tiles(&chr).unwrap();
        assert_eq!(atlas.size(), Size::new(128, 16));
        assert_eq!(atlas.texel(0, 8), 1);
        assert_eq!(atlas.texel(7, 15), 1);
        assert_eq!(atlas.texel(8, 8), 0);
    }

    #[test]
    fn test_decode_rejects_partial_tiles() {
        assert_eq!(
            decode_chr_tiles(&[0u8; 20]).unwrap_err(),
            TableError::PartialTile {
                len: 20,
                tile_bytes: CHR_TILE_BYTES
            }
        );
        assert_eq!(decode_chr_tiles(&[]).unwrap_err(), TableError::Empty);
    }

    #[test]
    fn test_attribute_quadrants() {
        let mut attributes = [0u8; ATTRIBUTE_BYTES];
        // top-left 0, top-right 1, bottom-left 2, bottom-right 3
        attributes[0] = 0b11_10_01_00;
        let table = expand_attribute_bytes(&attributes);

        assert_eq!(table.size(), NAMETABLE_SIZE);
        assert_eq!(table.texel(0, 0), 0);
        assert_eq!(table.texel(1, 1), 0);
        assert_eq!(table.texel(2, 0), 1);
        assert_eq!(table.texel(0, 2), 2);
        assert_eq!(table.texel(3, 3), 3);
        assert_eq!(table.texel(4, 0), 0);
    }

    #[test]
    fn test_palette_ram_masks_and_mirrors_backdrop() {
        let mut ram = [0u8; 32];
        for (i, b) in ram.iter_mut().enumerate() {
            *b = 0xC0 | i as u8;
        }
        let table = palette_ram_table(&ram);

        assert_eq!(table.width(), COMBINED_SLOTS);
        assert_eq!(table.texel(1), 1);
        assert_eq!(table.texel(15), 15);
        for slot in [0, 4, 8, 12] {
            assert_eq!(table.texel(slot), 0);
        }
    }

    #[test]
    fn test_nes_palette() {
        let palette = SystemPalette::nes();
        assert_eq!(palette.width(), SYSTEM_PALETTE_SIZE);
        assert_eq!(palette.texel(0x0F), Rgba8::new(0, 0, 0, 255));
        assert_eq!(palette.texel(0x30), Rgba8::new(0xFF, 0xFE, 0xFF, 255));
    }
}
