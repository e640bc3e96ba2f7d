//! tilepal render - indexed-color tile rendering
//!
//! A character quad's glyph bitmap stores small color indices. Each fragment
//! resolves its final color through a chain of lookup tables:
//!
//! 1. the glyph bitmap, sampled at the glyph UV, yields a raw color index;
//! 2. the attribute table, sampled at the fragment's unit-space position,
//!    selects one of four sub-palettes;
//! 3. the palette table maps the combined slot to a 6-bit color number;
//! 4. the system palette maps that number to a displayable color.
//!
//! The chain runs on the GPU ([`IndexedCharRenderer`]) and on the CPU
//! ([`IndexedLookup`] with [`SoftwareRasterizer`]) with the same texel
//! selection rules, so software output is the reference for GPU output.
//!
//! # Example
//!
//! ```ignore
//! use tilepal_render::*;
//!
//! let tables = ChainTables {
//!     glyphs: nes::decode_chr_tiles(&chr)?,
//!     attributes: nes::expand_attribute_bytes(&attribute_bytes),
//!     palette: nes::palette_ram_table(&palette_ram),
//!     system: SystemPalette::nes(),
//! };
//!
//! // CPU
//! let lookup = IndexedLookup::from_config(tables.clone(), &ChainConfig::default());
//! let frame = render_fullscreen(Size::new(256, 240), &lookup);
//!
//! // GPU
//! let ctx = GraphicsContext::new_owned_sync()?;
//! let renderer = IndexedCharRenderer::new(ctx.clone(), &ChainConfig::default());
//! let textures = ChainTextures::upload(&ctx, &tables);
//! let target = OffscreenTarget::new(ctx.clone(), Size::new(256, 240));
//! renderer.render(target.view(), &renderer.create_bind_group(&textures));
//! let gpu_frame = target.read_framebuffer()?;
//! ```

mod blit;
mod color;
mod config;
mod context;
pub mod geometry;
pub mod indexing;
pub mod nes;
mod readback;
mod renderer;
mod resolve;
mod sampler;
mod software;
mod table;
mod target;
mod textures;
mod types;

pub use blit::*;
pub use color::*;
pub use config::*;
pub use context::*;
pub use geometry::{CharQuad, CharVertex, ClipPos, GlyphUv, UnitPos};
pub use readback::*;
pub use renderer::IndexedCharRenderer;
pub use resolve::*;
pub use sampler::*;
pub use software::*;
pub use table::*;
pub use target::*;
pub use textures::*;
pub use types::*;

pub use tilepal_core::geometry::Size;
