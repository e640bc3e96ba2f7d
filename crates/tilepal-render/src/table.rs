//! Immutable lookup tables.
//!
//! Each stage of the color chain is modeled as an indexed array decoupled
//! from any texture hardware. Tables are built once by the resource layer and
//! shared read-only afterwards; cloning one only bumps a reference count.

use std::sync::Arc;

use tilepal_core::geometry::Size;

use crate::color::{Color, Rgba8, unorm8};

/// Error raised when a table's texels don't fit its declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A dimension was zero.
    Empty,
    /// The texel count doesn't match `width * height`.
    SizeMismatch { expected: usize, actual: usize },
    /// Source data doesn't divide into whole tiles.
    PartialTile { len: usize, tile_bytes: usize },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Lookup table has a zero dimension"),
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "Lookup table expects {} texels but {} were supplied",
                expected, actual
            ),
            Self::PartialTile { len, tile_bytes } => write!(
                f,
                "{} bytes of tile data is not a multiple of {} bytes per tile",
                len, tile_bytes
            ),
        }
    }
}

impl std::error::Error for TableError {}

/// A stored texel and how it reads back through a normalized sampler.
pub trait Texel: Copy + Send + Sync + 'static {
    /// The color a `*Unorm` texture returns for this texel.
    fn normalized(self) -> Color;
}

/// Single-channel byte, read back like `R8Unorm`: `(v / 255, 0, 0, 1)`.
impl Texel for u8 {
    #[inline]
    fn normalized(self) -> Color {
        Color::rgba(unorm8(self), 0.0, 0.0, 1.0)
    }
}

impl Texel for Rgba8 {
    #[inline]
    fn normalized(self) -> Color {
        self.to_color()
    }
}

/// A one-dimensional table of texels.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable1d<T> {
    texels: Arc<[T]>,
}

impl<T: Texel> LookupTable1d<T> {
    pub fn new(texels: impl Into<Arc<[T]>>) -> Result<Self, TableError> {
        let texels = texels.into();
        if texels.is_empty() {
            return Err(TableError::Empty);
        }
        if u32::try_from(texels.len()).is_err() {
            return Err(TableError::SizeMismatch {
                expected: u32::MAX as usize,
                actual: texels.len(),
            });
        }
        Ok(Self { texels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.texels.len() as u32
    }

    /// Texel at `index`. The caller is expected to have applied an address mode.
    #[inline]
    pub fn texel(&self, index: usize) -> T {
        self.texels[index]
    }

    /// Texel at `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.texels.get(index).copied()
    }

    pub fn texels(&self) -> &[T] {
        &self.texels
    }
}

/// A two-dimensional, row-major table of texels. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable2d<T> {
    size: Size<u32>,
    texels: Arc<[T]>,
}

impl<T: Texel> LookupTable2d<T> {
    pub fn new(size: Size<u32>, texels: impl Into<Arc<[T]>>) -> Result<Self, TableError> {
        let texels = texels.into();
        if size.is_empty() {
            return Err(TableError::Empty);
        }
        if texels.len() != size.area() {
            return Err(TableError::SizeMismatch {
                expected: size.area(),
                actual: texels.len(),
            });
        }
        Ok(Self { size, texels })
    }

    /// A table where every texel holds `value`.
    pub fn filled(size: Size<u32>, value: T) -> Result<Self, TableError> {
        Self::new(size, vec![value; size.area()])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> T {
        self.texels[y * self.size.width as usize + x]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.size.width as usize || y >= self.size.height as usize {
            return None;
        }
        Some(self.texel(x, y))
    }

    pub fn texels(&self) -> &[T] {
        &self.texels
    }
}

macro_rules! table_wrapper {
    ($(#[$meta:meta])* $name:ident, $inner:ident<$texel:ty>) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name($inner<$texel>);

        impl $name {
            pub fn as_table(&self) -> &$inner<$texel> {
                &self.0
            }
        }

        impl From<$inner<$texel>> for $name {
            fn from(table: $inner<$texel>) -> Self {
                Self(table)
            }
        }

        impl std::ops::Deref for $name {
            type Target = $inner<$texel>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

table_wrapper!(
    /// Character bitmap: each texel is a raw color index, addressed by glyph UV.
    GlyphBitmap,
    LookupTable2d<u8>
);

table_wrapper!(
    /// Per-tile sub-palette selection, addressed by unit-space position.
    AttributeTable,
    LookupTable2d<u8>
);

table_wrapper!(
    /// Maps a combined (color index, sub-palette) slot to a 6-bit system palette index.
    PaletteTable,
    LookupTable1d<u8>
);

table_wrapper!(
    /// The displayable colors every other table ultimately indexes into.
    SystemPalette,
    LookupTable1d<Rgba8>
);

table_wrapper!(
    /// Plain RGBA image for the direct-sample variant.
    RgbaImage,
    LookupTable2d<Rgba8>
);

impl GlyphBitmap {
    pub fn new(size: Size<u32>, indices: impl Into<Arc<[u8]>>) -> Result<Self, TableError> {
        LookupTable2d::new(size, indices).map(Self)
    }
}

impl AttributeTable {
    pub fn new(size: Size<u32>, offsets: impl Into<Arc<[u8]>>) -> Result<Self, TableError> {
        LookupTable2d::new(size, offsets).map(Self)
    }

    /// Every tile uses the same sub-palette.
    pub fn uniform(size: Size<u32>, offset: u8) -> Result<Self, TableError> {
        LookupTable2d::filled(size, offset).map(Self)
    }
}

impl PaletteTable {
    pub fn new(entries: impl Into<Arc<[u8]>>) -> Result<Self, TableError> {
        LookupTable1d::new(entries).map(Self)
    }
}

impl SystemPalette {
    pub fn new(colors: impl Into<Arc<[Rgba8]>>) -> Result<Self, TableError> {
        LookupTable1d::new(colors).map(Self)
    }
}

impl RgbaImage {
    pub fn new(size: Size<u32>, texels: impl Into<Arc<[Rgba8]>>) -> Result<Self, TableError> {
        LookupTable2d::new(size, texels).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2d_size_mismatch() {
        let err = GlyphBitmap::new(Size::new(4, 4), vec![0u8; 15]).unwrap_err();
        assert_eq!(
            err,
            TableError::SizeMismatch {
                expected: 16,
                actual: 15
            }
        );
        assert!(err.to_string().contains("expects 16 texels"));
    }

    #[test]
    fn test_empty_tables_rejected() {
        assert_eq!(PaletteTable::new(Vec::<u8>::new()).unwrap_err(), TableError::Empty);
        assert_eq!(
            AttributeTable::uniform(Size::new(0, 30), 1).unwrap_err(),
            TableError::Empty
        );
    }

    #[test]
    fn test_row_major_addressing() {
        let table = LookupTable2d::new(Size::new(3, 2), vec![0u8, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(table.texel(0, 0), 0);
        assert_eq!(table.texel(2, 0), 2);
        assert_eq!(table.texel(0, 1), 3);
        assert_eq!(table.get(3, 0), None);
        assert_eq!(table.get(2, 1), Some(5));
    }

    #[test]
    fn test_r8_texel_reads_red_only() {
        let c = 255u8.normalized();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));
        assert_eq!(51u8.normalized().r, 0.2);
    }

    #[test]
    fn test_clone_shares_storage() {
        let palette = PaletteTable::new(vec![1u8, 2, 3]).unwrap();
        let copy = palette.clone();
        assert!(std::ptr::eq(palette.texels().as_ptr(), copy.texels().as_ptr()));
    }
}
