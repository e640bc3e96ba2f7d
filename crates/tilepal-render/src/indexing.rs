//! Index arithmetic of the palette lookup chain.
//!
//! The emulated hardware stores color indices in 8-bit channels, selects one
//! of four sub-palettes of four colors per tile, and keeps 6-bit entries in
//! its palette table. Those widths fix every scale factor below.
//!
//! Two formulations live here:
//!
//! - float helpers that mirror the fragment shader step by step, used by the
//!   reference resolver;
//! - integer helpers that compute the texel the float chain lands on directly
//!   from the stored bytes.
//!
//! The two agree on the palette-table texel for every raw index `0..=255`
//! and sub-palette `0..=3` while the table is at most
//! [`EXACT_PALETTE_WIDTH`] texels wide. Past that, f32 rounding in the float
//! chain can move combined slots of 16 and above by one texel; in-range
//! slots (`raw + 4 * sub_palette < 16`) still agree up to
//! [`EXACT_IN_RANGE_WIDTH`]. The system-palette texel agrees for every entry
//! `0..=255` at any width up to [`EXACT_SYSTEM_WIDTH`].

/// Bits per stored color index.
pub const INDEX_BITS: u32 = 8;

/// Scale recovering an 8-bit index from a normalized sample.
pub const INDEX_SCALE: f32 = (1u32 << INDEX_BITS) as f32;

/// Bits of color index within one sub-palette.
pub const SUB_PALETTE_BITS: u32 = 2;

/// Colors per sub-palette; one attribute step advances this many slots.
pub const SLOTS_PER_SUB_PALETTE: u32 = 1 << SUB_PALETTE_BITS;

/// Number of sub-palettes an attribute can select.
pub const SUB_PALETTE_COUNT: u32 = 4;

/// Total combined (color, sub-palette) slots.
pub const COMBINED_SLOTS: u32 = SLOTS_PER_SUB_PALETTE * SUB_PALETTE_COUNT;

/// Divisor renormalizing a `0..COMBINED_SLOTS` index into `[0, 1]`.
pub const COMBINED_NORMALIZER: f32 = (COMBINED_SLOTS - 1) as f32;

/// Significant bits of a palette-table entry.
pub const PALETTE_ENTRY_BITS: u32 = 6;

/// Entries in the system palette (one per palette-table value).
pub const SYSTEM_PALETTE_SIZE: u32 = 1 << PALETTE_ENTRY_BITS;

/// `256 / 64` in integer arithmetic, i.e. 4.
///
/// Multiplying a normalized 6-bit entry by this maps it onto the system
/// palette's `[0, 1]` coordinate range.
pub const PALETTE_RESCALE: u32 = (1 << INDEX_BITS) / SYSTEM_PALETTE_SIZE;

/// Widest palette table for which [`palette_texel`] matches the float chain
/// for every stored raw index and sub-palette.
pub const EXACT_PALETTE_WIDTH: u32 = 256;

/// Widest system palette for which [`system_texel`] matches the float chain
/// for every stored entry.
pub const EXACT_SYSTEM_WIDTH: u32 = 4096;

/// Widest palette table for which in-range combined slots match the float
/// chain.
pub const EXACT_IN_RANGE_WIDTH: u32 = 4096;

const UNORM8_MAX: u64 = 255;

/// Step 1 and 2: recover an index from a normalized red-channel sample.
#[inline]
pub fn recover_index(sample: f32) -> f32 {
    sample * INDEX_SCALE
}

/// Step 3: fold a raw color index and an attribute offset into a normalized
/// palette-table coordinate.
#[inline]
pub fn combined_index(raw_color_index: f32, attribute_offset: f32) -> f32 {
    (raw_color_index + attribute_offset * SLOTS_PER_SUB_PALETTE as f32) / COMBINED_NORMALIZER
}

/// Step 4: rescale a normalized palette-table sample into a system-palette
/// coordinate.
#[inline]
pub fn palette_coordinate(sample: f32) -> f32 {
    sample * PALETTE_RESCALE as f32
}

/// Palette-table texel (before the address mode) selected by stored bytes.
///
/// Evaluates `floor(combined_index * width)` exactly:
/// `(raw + 4 * attribute) * 256 * width / (255 * 15)`. The f32 chain lands on
/// the same texel for widths up to [`EXACT_PALETTE_WIDTH`].
pub fn palette_texel(raw: u8, attribute: u8, width: u32) -> i64 {
    let combined = u64::from(raw) + u64::from(attribute) * u64::from(SLOTS_PER_SUB_PALETTE);
    let numerator = combined * (1u64 << INDEX_BITS) * u64::from(width);
    let denominator = UNORM8_MAX * u64::from(COMBINED_SLOTS - 1);
    (numerator / denominator) as i64
}

/// System-palette texel (before the address mode) selected by a stored
/// palette-table entry: `entry * 4 * width / 255`.
pub fn system_texel(entry: u8, width: u32) -> i64 {
    (u64::from(entry) * u64::from(PALETTE_RESCALE) * u64::from(width) / UNORM8_MAX) as i64
}
