//! Offscreen color target that can be read back.

use std::sync::Arc;

use tilepal_core::geometry::Size;

use crate::context::GraphicsContext;
use crate::readback::{GpuReadback, ReadbackError};
use crate::software::Framebuffer;
use crate::types::GpuTexture;

/// An `Rgba8Unorm` texture usable as a render attachment and copy source.
pub struct OffscreenTarget {
    texture: GpuTexture,
    context: Arc<GraphicsContext>,
}

impl OffscreenTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(context: Arc<GraphicsContext>, size: Size<u32>) -> Self {
        let texture = GpuTexture::new_2d(
            context.device(),
            Some("Offscreen Target"),
            size.width,
            size.height,
            Self::FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        );
        Self { texture, context }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        self.texture.view()
    }

    pub fn texture(&self) -> &wgpu::Texture {
        self.texture.texture()
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.texture.width(), self.texture.height())
    }

    /// Start a copy of the current contents.
    pub fn capture(&self) -> Result<GpuReadback, ReadbackError> {
        GpuReadback::from_texture(self.context.clone(), self.texture.texture())
    }

    /// Copy the current contents back into a [`Framebuffer`], blocking.
    pub fn read_framebuffer(&self) -> Result<Framebuffer, ReadbackError> {
        self.capture()?.read_framebuffer()
    }
}
