//! GPU copies of the lookup tables.
//!
//! Byte tables become `R8Unorm` textures so the shader reads `v / 255` in the
//! red channel, the same value [`Texel::normalized`](crate::table::Texel)
//! gives the CPU path. The palette table and system palette are stored as
//! `width x 1` 2D textures: GL backends read zero from 1D textures.

use tilepal_core::profiling::profile_function;

use crate::color::Rgba8;
use crate::context::GraphicsContext;
use crate::resolve::ChainTables;
use crate::table::{LookupTable1d, LookupTable2d, RgbaImage};
use crate::types::GpuTexture;

pub const INDEX_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const TABLE_USAGE: wgpu::TextureUsages =
    wgpu::TextureUsages::TEXTURE_BINDING.union(wgpu::TextureUsages::COPY_DST);

fn upload_2d_indices(ctx: &GraphicsContext, label: &str, table: &LookupTable2d<u8>) -> GpuTexture {
    let texture = GpuTexture::new_2d(
        ctx.device(),
        Some(label),
        table.width(),
        table.height(),
        INDEX_FORMAT,
        TABLE_USAGE,
    );
    texture.write(ctx.queue(), table.texels());
    texture
}

fn upload_row_indices(ctx: &GraphicsContext, label: &str, table: &LookupTable1d<u8>) -> GpuTexture {
    let texture = GpuTexture::new_2d(ctx.device(), Some(label), table.width(), 1, INDEX_FORMAT, TABLE_USAGE);
    texture.write(ctx.queue(), table.texels());
    texture
}

fn upload_row_colors(
    ctx: &GraphicsContext,
    label: &str,
    table: &LookupTable1d<Rgba8>,
) -> GpuTexture {
    let texture = GpuTexture::new_2d(ctx.device(), Some(label), table.width(), 1, COLOR_FORMAT, TABLE_USAGE);
    texture.write(ctx.queue(), bytemuck::cast_slice(table.texels()));
    texture
}

/// Upload an RGBA image for the direct-sample pipeline.
pub fn upload_image(ctx: &GraphicsContext, image: &RgbaImage) -> GpuTexture {
    let texture = GpuTexture::new_2d(
        ctx.device(),
        Some("Direct Sample Source"),
        image.width(),
        image.height(),
        COLOR_FORMAT,
        TABLE_USAGE,
    );
    texture.write(ctx.queue(), bytemuck::cast_slice(image.texels()));
    texture
}

/// The four chain tables resident on the GPU.
pub struct ChainTextures {
    pub glyphs: GpuTexture,
    pub attributes: GpuTexture,
    pub palette: GpuTexture,
    pub system: GpuTexture,
}

impl ChainTextures {
    pub fn upload(ctx: &GraphicsContext, tables: &ChainTables) -> Self {
        profile_function!();

        let textures = Self {
            glyphs: upload_2d_indices(ctx, "Glyph Bitmap", &tables.glyphs),
            attributes: upload_2d_indices(ctx, "Attribute Table", &tables.attributes),
            palette: upload_row_indices(ctx, "Palette Table", &tables.palette),
            system: upload_row_colors(ctx, "System Palette", &tables.system),
        };

        tracing::debug!(
            "Uploaded chain tables: glyphs {}x{}, attributes {}x{}, palette {}, system {}",
            textures.glyphs.width(),
            textures.glyphs.height(),
            textures.attributes.width(),
            textures.attributes.height(),
            textures.palette.width(),
            textures.system.width()
        );

        textures
    }

    /// Rewrite the attribute and palette tables in place.
    ///
    /// Returns `false` without writing anything if either table changed
    /// size; upload a new set of textures in that case.
    pub fn update(&self, ctx: &GraphicsContext, tables: &ChainTables) -> bool {
        profile_function!();

        if tables.attributes.width() != self.attributes.width()
            || tables.attributes.height() != self.attributes.height()
            || tables.palette.width() != self.palette.width()
        {
            tracing::debug!("Chain table sizes changed; update skipped");
            return false;
        }

        self.attributes.write(ctx.queue(), tables.attributes.texels());
        self.palette.write(ctx.queue(), tables.palette.texels());
        true
    }
}
