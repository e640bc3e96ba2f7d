/// An RGBA color with `f32` components, as produced by a texture sample.
///
/// Samples of normalized textures land in `0.0..=1.0`; the arithmetic in
/// the lookup chain may push intermediate values outside that range, so no
/// clamping is applied here.
///
/// ```
/// use tilepal_render::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_bytes = Color::from_rgba_u8(128, 64, 32, 255);
/// assert_eq!(from_bytes.to_rgba8().r, 128);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity (alpha = 1.0).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    ///
    /// This is exactly what an `Rgba8Unorm` texel reads back as.
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: unorm8(r),
            g: unorm8(g),
            b: unorm8(b),
            a: unorm8(a),
        }
    }

    /// Quantize back to 8 bits per channel, as a `Rgba8Unorm` color target would.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        )
    }

    /// Convert to the equivalent `wgpu::Color` (f64 components).
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Convert to an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f32; 4]> for Color {
    fn from(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

/// A stored 8-bit-per-channel RGBA texel.
///
/// This is the storage format of the system palette and of framebuffers
/// produced by the software rasterizer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque texel from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 0xFF,
        }
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba_u8(self.r, self.g, self.b, self.a)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

#[inline]
pub(crate) fn unorm8(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_round_trips_through_color() {
        for v in [0u8, 1, 40, 127, 128, 254, 255] {
            let texel = Rgba8::new(v, 255 - v, v / 2, 255);
            assert_eq!(texel.to_color().to_rgba8(), texel);
        }
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba8::from_hex(0xFF8800), Rgba8::new(0xFF, 0x88, 0x00, 0xFF));
    }

    #[test]
    fn test_quantize_saturates() {
        let c = Color::rgba(2.0, -1.0, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), Rgba8::new(255, 0, 128, 255));
    }
}
