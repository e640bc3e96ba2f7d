//! Direct-sample pipeline: draws an RGBA texture through the same geometry
//! stage as the indexed renderer, without any palette lookup.

use std::sync::Arc;

use tilepal_core::profiling::profile_function;

use crate::context::GraphicsContext;
use crate::geometry::{CharQuad, CharVertex};
use crate::renderer::{create_char_pipeline, sampler_entry, texture_entry};
use crate::sampler::TableSampler;
use crate::types::TypedBuffer;

/// Renders a texture as a full-target quad.
///
/// ```ignore
/// let blit = BlitRenderer::new(ctx.clone(), wgpu::TextureFormat::Rgba8Unorm);
/// blit.blit(&mut render_pass, texture.view());
/// ```
pub struct BlitRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    vertex_buffer: TypedBuffer<CharVertex>,
    context: Arc<GraphicsContext>,
}

impl BlitRenderer {
    pub fn new(context: Arc<GraphicsContext>, target_format: wgpu::TextureFormat) -> Self {
        Self::new_with_options(context, target_format, BlitOptions::default())
    }

    pub fn new_with_options(
        context: Arc<GraphicsContext>,
        target_format: wgpu::TextureFormat,
        options: BlitOptions,
    ) -> Self {
        profile_function!();
        let device = context.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let sampler = device.create_sampler(&options.sampler.to_descriptor(Some("Blit Sampler")));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                sampler_entry(1),
            ],
        });

        let pipeline = create_char_pipeline(
            device,
            "Blit Pipeline",
            &shader,
            &bind_group_layout,
            target_format,
            options.blend_state,
        );

        let vertex_buffer = TypedBuffer::new_vertex(
            device,
            Some("Blit Vertex Buffer"),
            &CharQuad::fullscreen().vertices(),
        );

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            vertex_buffer,
            context,
        }
    }

    /// Create a bind group for a texture.
    ///
    /// Cache it if the same texture is blitted repeatedly.
    pub fn create_bind_group(&self, texture_view: &wgpu::TextureView) -> wgpu::BindGroup {
        self.context
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Blit Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(texture_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            })
    }

    /// Blit a texture. Creates a bind group on every call.
    pub fn blit(&self, render_pass: &mut wgpu::RenderPass, texture_view: &wgpu::TextureView) {
        profile_function!();
        let bind_group = self.create_bind_group(texture_view);
        self.blit_with_bind_group(render_pass, &bind_group);
    }

    pub fn blit_with_bind_group(
        &self,
        render_pass: &mut wgpu::RenderPass,
        bind_group: &wgpu::BindGroup,
    ) {
        render_pass.push_debug_group("BlitRenderer::blit");
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        render_pass.draw(0..self.vertex_buffer.len(), 0..1);
        render_pass.pop_debug_group();
    }
}

/// Options for configuring the blit renderer.
#[derive(Debug, Clone)]
pub struct BlitOptions {
    /// Nearest-filtering sampler; its address mode handles UVs outside `[0, 1]`.
    pub sampler: TableSampler,
    pub blend_state: Option<wgpu::BlendState>,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            sampler: TableSampler::clamp_to_edge(),
            blend_state: Some(wgpu::BlendState::REPLACE),
        }
    }
}

impl BlitOptions {
    /// Alpha-blend the source over the target.
    pub fn alpha_blend() -> Self {
        Self {
            blend_state: Some(wgpu::BlendState::ALPHA_BLENDING),
            ..Self::default()
        }
    }

    pub fn with_sampler(mut self, sampler: TableSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_blend(mut self, blend: Option<wgpu::BlendState>) -> Self {
        self.blend_state = blend;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_replace_and_clamp() {
        let options = BlitOptions::default();
        assert_eq!(options.blend_state, Some(wgpu::BlendState::REPLACE));
        assert_eq!(options.sampler, TableSampler::clamp_to_edge());

        let blended = BlitOptions::alpha_blend().with_sampler(TableSampler::repeat());
        assert_eq!(blended.blend_state, Some(wgpu::BlendState::ALPHA_BLENDING));
        assert_eq!(blended.sampler, TableSampler::repeat());
    }
}
