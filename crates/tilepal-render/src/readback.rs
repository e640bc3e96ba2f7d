//! GPU readback of rendered targets.
//!
//! Copies a texture into a staging buffer, waits for the map, and strips row
//! padding so the result lines up byte for byte with a software
//! [`Framebuffer`].

use std::sync::Arc;

use tilepal_core::geometry::Size;
use tilepal_core::profiling::profile_function;

use crate::color::Rgba8;
use crate::context::GraphicsContext;
use crate::software::Framebuffer;

/// GPU readback error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadbackError {
    /// Buffer mapping failed
    MapFailed(String),
    /// Image encoding failed
    EncodeFailed(String),
    /// Invalid dimensions
    InvalidDimensions,
    /// Only 8-bit RGBA targets can be read back
    UnsupportedFormat(wgpu::TextureFormat),
}

impl std::fmt::Display for ReadbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapFailed(msg) => write!(f, "Buffer mapping failed: {}", msg),
            Self::EncodeFailed(msg) => write!(f, "Image encoding failed: {}", msg),
            Self::InvalidDimensions => write!(f, "Invalid dimensions for readback"),
            Self::UnsupportedFormat(format) => {
                write!(f, "Unsupported texture format for readback: {:?}", format)
            }
        }
    }
}

impl std::error::Error for ReadbackError {}

const BYTES_PER_PIXEL: u32 = 4;

/// Row stride of a texture-to-buffer copy, padded to
/// `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * BYTES_PER_PIXEL).div_ceil(align) * align
}

/// Staging buffer holding a copy of one texture.
pub struct GpuReadback {
    buffer: wgpu::Buffer,
    size: Size<u32>,
    bytes_per_row: u32,
    format: wgpu::TextureFormat,
    context: Arc<GraphicsContext>,
}

impl GpuReadback {
    /// Copy `texture` into a staging buffer. The copy is submitted right away.
    pub fn from_texture(
        context: Arc<GraphicsContext>,
        texture: &wgpu::Texture,
    ) -> Result<Self, ReadbackError> {
        profile_function!();
        let extent = texture.size();
        let size = Size::new(extent.width, extent.height);
        let format = texture.format();

        if size.is_empty() {
            return Err(ReadbackError::InvalidDimensions);
        }
        if !matches!(
            format,
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
        ) {
            return Err(ReadbackError::UnsupportedFormat(format));
        }

        let bytes_per_row = padded_bytes_per_row(size.width);
        let buffer = context.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: u64::from(bytes_per_row) * u64::from(size.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback_encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(size.height),
                },
            },
            extent,
        );

        context.queue().submit(Some(encoder.finish()));

        Ok(Self {
            buffer,
            size,
            bytes_per_row,
            format,
            context,
        })
    }

    /// Map the staging buffer and return tightly packed RGBA rows, top row
    /// first. Blocks until the GPU has finished the copy.
    pub fn read(&self) -> Result<Vec<u8>, ReadbackError> {
        profile_function!();
        let slice = self.buffer.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.context
            .device()
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| ReadbackError::MapFailed(e.to_string()))?;

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ReadbackError::MapFailed(e.to_string())),
            Err(e) => return Err(ReadbackError::MapFailed(e.to_string())),
        }

        let row_bytes = (self.size.width * BYTES_PER_PIXEL) as usize;
        let mut result = Vec::with_capacity(row_bytes * self.size.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(self.bytes_per_row as usize) {
                result.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.buffer.unmap();

        Ok(result)
    }

    /// Read into a [`Framebuffer`] for comparison with software renders.
    pub fn read_framebuffer(&self) -> Result<Framebuffer, ReadbackError> {
        let bytes = self.read()?;
        let pixels = bytemuck::cast_slice::<u8, Rgba8>(&bytes).to_vec();
        Framebuffer::from_pixels(self.size, pixels).ok_or(ReadbackError::InvalidDimensions)
    }

    /// Save the readback data as a PNG file.
    #[cfg(feature = "image")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<(), ReadbackError> {
        let data = self.read()?;
        let img = image::RgbaImage::from_raw(self.size.width, self.size.height, data).ok_or(
            ReadbackError::EncodeFailed("Failed to create image from raw data".to_string()),
        )?;
        img.save(path)
            .map_err(|e| ReadbackError::EncodeFailed(e.to_string()))
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
