use crate::color::Color;
use crate::sampler::AddressMode;

/// Configuration of the lookup chain and the pipelines that run it.
///
/// Every table defaults to [`AddressMode::ClampToEdge`]. Under that policy
/// every combined slot of a 16-entry palette table selects itself, including
/// the last one, whose coordinate lands just past the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    /// Boundary policy of the glyph bitmap sampler.
    pub glyph_address_mode: AddressMode,
    /// Boundary policy of the attribute table sampler.
    pub attribute_address_mode: AddressMode,
    /// Boundary policy of the palette table sampler.
    pub palette_address_mode: AddressMode,
    /// Boundary policy of the system palette sampler.
    pub system_address_mode: AddressMode,
    /// Format of the color target pipelines render into.
    pub target_format: wgpu::TextureFormat,
    /// Color the target is cleared to before drawing.
    pub clear_color: Color,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            glyph_address_mode: AddressMode::ClampToEdge,
            attribute_address_mode: AddressMode::ClampToEdge,
            palette_address_mode: AddressMode::ClampToEdge,
            system_address_mode: AddressMode::ClampToEdge,
            target_format: wgpu::TextureFormat::Rgba8Unorm,
            clear_color: Color::BLACK,
        }
    }
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `mode` for every table.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.glyph_address_mode = mode;
        self.attribute_address_mode = mode;
        self.palette_address_mode = mode;
        self.system_address_mode = mode;
        self
    }

    /// Boundary policy for glyph UVs.
    pub fn with_glyph_address_mode(mut self, mode: AddressMode) -> Self {
        self.glyph_address_mode = mode;
        self
    }

    pub fn with_attribute_address_mode(mut self, mode: AddressMode) -> Self {
        self.attribute_address_mode = mode;
        self
    }

    pub fn with_palette_address_mode(mut self, mode: AddressMode) -> Self {
        if mode != AddressMode::ClampToEdge {
            tracing::warn!(
                "palette table address mode {:?}: the last combined slot will wrap",
                mode
            );
        }
        self.palette_address_mode = mode;
        self
    }

    pub fn with_system_address_mode(mut self, mode: AddressMode) -> Self {
        self.system_address_mode = mode;
        self
    }

    pub fn with_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}
