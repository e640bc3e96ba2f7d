//! CPU reference rasterizer.
//!
//! Mirrors what the GPU pipeline does with the same vertices: the geometry
//! stage runs per vertex, triangles are rasterized at pixel centers, the
//! varyings are interpolated barycentrically and a [`ColorResolver`] runs once
//! per covered pixel. Its output is the ground truth GPU renders are compared
//! against.

use tilepal_core::math::Vec2;
use tilepal_core::geometry::Size;
use tilepal_core::profiling::{profile_function, profile_scope};

use crate::color::{Color, Rgba8};
use crate::geometry::{CharVertex, Varyings, run_vertex};
use crate::resolve::ColorResolver;

/// An 8-bit RGBA image, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    size: Size<u32>,
    pixels: Vec<Rgba8>,
}

impl Framebuffer {
    pub fn new(size: Size<u32>, clear: Rgba8) -> Self {
        Self {
            size,
            pixels: vec![clear; size.area()],
        }
    }

    /// Wrap existing pixels; `None` if their count doesn't match `size`.
    pub fn from_pixels(size: Size<u32>, pixels: Vec<Rgba8>) -> Option<Self> {
        (pixels.len() == size.area()).then_some(Self { size, pixels })
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Tightly packed RGBA bytes, the layout `Rgba8Unorm` readbacks produce.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Save the framebuffer as a PNG file.
    #[cfg(feature = "image")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            self.as_bytes(),
            self.size.width,
            self.size.height,
            image::ExtendedColorType::Rgba8,
        )
    }
}

/// Rasterizes [`CharVertex`] triangle lists into a [`Framebuffer`].
pub struct SoftwareRasterizer {
    target: Framebuffer,
}

impl SoftwareRasterizer {
    pub fn new(size: Size<u32>, clear: Color) -> Self {
        Self {
            target: Framebuffer::new(size, clear.to_rgba8()),
        }
    }

    pub fn target(&self) -> &Framebuffer {
        &self.target
    }

    pub fn into_target(self) -> Framebuffer {
        self.target
    }

    pub fn clear(&mut self, color: Color) {
        self.target.clear(color.to_rgba8());
    }

    /// Draw a triangle list. Trailing vertices that don't form a whole
    /// triangle are ignored.
    ///
    /// Pixels on an edge shared by two triangles may be shaded twice; since
    /// resolvers are pure and nothing blends, the result is the same.
    pub fn draw(&mut self, vertices: &[CharVertex], resolver: &dyn ColorResolver) {
        profile_function!();

        if vertices.len() % 3 != 0 {
            tracing::warn!(
                "{} vertices is not a whole number of triangles",
                vertices.len()
            );
        }

        for triangle in vertices.chunks_exact(3) {
            let varyings = [
                run_vertex(&triangle[0]),
                run_vertex(&triangle[1]),
                run_vertex(&triangle[2]),
            ];
            self.rasterize(&varyings, resolver);
        }
    }

    fn rasterize(&mut self, v: &[Varyings; 3], resolver: &dyn ColorResolver) {
        profile_scope!("rasterize_triangle");

        let size = self.target.size;
        let screen = (*v).map(|varyings| to_screen(varyings.clip.0, size));

        let area = edge(screen[0], screen[1], screen[2]);
        if area == 0.0 {
            return;
        }

        let min = screen[0].min(screen[1]).min(screen[2]);
        let max = screen[0].max(screen[1]).max(screen[2]);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as i64).clamp(0, size.width as i64) as u32;
        let y1 = (max.y.ceil() as i64).clamp(0, size.height as i64) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(screen[1], screen[2], p) / area;
                let w1 = edge(screen[2], screen[0], p) / area;
                let w2 = edge(screen[0], screen[1], p) / area;
                if w0 < -COVERAGE_EPSILON || w1 < -COVERAGE_EPSILON || w2 < -COVERAGE_EPSILON {
                    continue;
                }

                let fragment = Varyings::interpolate(v, [w0, w1, w2]);
                let color = resolver.resolve(fragment.uv, fragment.unit_pos);
                let index = y as usize * size.width as usize + x as usize;
                self.target.pixels[index] = color.to_rgba8();
            }
        }
    }
}

/// Barycentric slack so pixel centers on a shared diagonal aren't dropped by
/// rounding in both triangles.
const COVERAGE_EPSILON: f32 = 1e-6;

/// Viewport transform: clip space to pixel coordinates, y down.
#[inline]
fn to_screen(clip: Vec2, size: Size<u32>) -> Vec2 {
    Vec2::new(
        (clip.x + 1.0) * 0.5 * size.width as f32,
        (1.0 - clip.y) * 0.5 * size.height as f32,
    )
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Render one full-screen quad through `resolver`.
pub fn render_fullscreen(size: Size<u32>, resolver: &dyn ColorResolver) -> Framebuffer {
    let mut rasterizer = SoftwareRasterizer::new(size, Color::TRANSPARENT);
    rasterizer.draw(&crate::geometry::CharQuad::fullscreen().vertices(), resolver);
    rasterizer.into_target()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CharQuad, GlyphUv, UnitPos};

    /// Encodes the interpolated unit position into the color.
    struct PositionProbe;

    impl ColorResolver for PositionProbe {
        fn resolve(&self, _uv: GlyphUv, pos: UnitPos) -> Color {
            Color::rgb(pos.0.x, pos.0.y, 0.0)
        }
    }

    struct UvProbe;

    impl ColorResolver for UvProbe {
        fn resolve(&self, uv: GlyphUv, _pos: UnitPos) -> Color {
            Color::rgb(uv.0.x, uv.0.y, 1.0)
        }
    }

    #[test]
    fn test_fullscreen_covers_every_pixel() {
        let fb = render_fullscreen(Size::new(16, 12), &PositionProbe);
        assert!(fb.pixels().iter().all(|p| p.a == 255));
    }

    #[test]
    fn test_top_row_has_smallest_unit_y() {
        let fb = render_fullscreen(Size::new(4, 4), &PositionProbe);
        // pixel centers at 1/8, 3/8, 5/8, 7/8
        assert_eq!(fb.pixel(0, 0), Color::rgb(0.125, 0.125, 0.0).to_rgba8());
        assert_eq!(fb.pixel(3, 3), Color::rgb(0.875, 0.875, 0.0).to_rgba8());
        assert!(fb.pixel(0, 0).g < fb.pixel(0, 3).g);
    }

    #[test]
    fn test_partial_quad_only_touches_its_pixels() {
        let quad = CharQuad {
            min: UnitPos::new(0.5, 0.0),
            max: UnitPos::new(1.0, 0.5),
            uv_min: GlyphUv::new(0.0, 0.0),
            uv_max: GlyphUv::new(1.0, 1.0),
        };
        let mut raster = SoftwareRasterizer::new(Size::new(8, 8), Color::TRANSPARENT);
        raster.draw(&quad.vertices(), &UvProbe);
        let fb = raster.target();

        for y in 0..8 {
            for x in 0..8 {
                let inside = x >= 4 && y < 4;
                assert_eq!(fb.pixel(x, y).a == 255, inside, "pixel ({x}, {y})");
            }
        }
        // uv restarts at the quad's corner
        assert_eq!(fb.pixel(4, 0), Color::rgb(0.125, 0.125, 1.0).to_rgba8());
    }

    #[test]
    fn test_incomplete_triangle_is_ignored() {
        let verts = CharQuad::fullscreen().vertices();
        let mut raster = SoftwareRasterizer::new(Size::new(2, 2), Color::TRANSPARENT);
        raster.draw(&verts[..2], &UvProbe);
        assert!(raster.target().pixels().iter().all(|p| *p == Rgba8::default()));
    }
}
