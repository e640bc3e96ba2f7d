/// SIMD-friendly math types from [`glam`], used for CPU-side coordinate work.
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

/// `#[repr(C)]` vector types for GPU vertex uploads.
///
/// These are [`bytemuck::Pod`] and match the WGSL `vec2<f32>` layout, so slices of them can be cast straight to bytes.
///
/// ```
/// use tilepal_core::math::PackedVec2;
/// use bytemuck::cast_slice;
///
/// let corners = [PackedVec2::new(0.0, 0.0), PackedVec2::new(1.0, 1.0)];
/// let bytes: &[u8] = cast_slice(&corners);
/// assert_eq!(bytes.len(), 16);
/// ```
pub mod packed {
    use bytemuck::{Pod, Zeroable};

    /// A 2D vector with guaranteed `#[repr(C)]` layout.
    ///
    /// ```text
    /// Offset | Field | Size
    /// -------|-------|------
    /// 0      | x     | 4 bytes (f32)
    /// 4      | y     | 4 bytes (f32)
    /// Total: 8 bytes
    /// ```
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    impl Vec2 {
        pub const fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }
    }

    impl From<glam::Vec2> for Vec2 {
        fn from(v: glam::Vec2) -> Self {
            Self { x: v.x, y: v.y }
        }
    }

    impl From<Vec2> for glam::Vec2 {
        fn from(v: Vec2) -> Self {
            glam::Vec2::new(v.x, v.y)
        }
    }
}

pub use fast::*;
pub use packed::Vec2 as PackedVec2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_layout() {
        assert_eq!(std::mem::size_of::<PackedVec2>(), 8);
    }

    #[test]
    fn test_packed_conversion() {
        let v = Vec2::new(0.25, 0.75);
        let packed: PackedVec2 = v.into();
        assert_eq!(packed, PackedVec2::new(0.25, 0.75));
        assert_eq!(Vec2::from(packed), v);
    }
}
