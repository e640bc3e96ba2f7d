//! GPU pipeline for the indexed lookup chain.

use std::sync::Arc;

use tilepal_core::profiling::profile_function;

use crate::config::ChainConfig;
use crate::context::GraphicsContext;
use crate::geometry::{CharQuad, CharVertex};
use crate::resolve::ChainSamplers;
use crate::textures::ChainTextures;
use crate::types::TypedBuffer;

/// Layout entry for a sampled float texture read with nearest filtering.
pub(crate) fn texture_entry(
    binding: u32,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension,
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
        },
        count: None,
    }
}

pub(crate) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
        count: None,
    }
}

/// Triangle-list pipeline over [`CharVertex`] buffers.
pub(crate) fn create_char_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    target_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[CharVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// Draws character quads through the glyph → attribute → palette → system
/// palette chain.
///
/// ```ignore
/// let renderer = IndexedCharRenderer::new(ctx.clone(), &ChainConfig::default());
/// let textures = ChainTextures::upload(&ctx, &tables);
/// let bind_group = renderer.create_bind_group(&textures);
/// renderer.render(target.view(), &bind_group);
/// ```
pub struct IndexedCharRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    samplers: [wgpu::Sampler; 4],
    vertex_buffer: TypedBuffer<CharVertex>,
    config: ChainConfig,
    context: Arc<GraphicsContext>,
}

impl IndexedCharRenderer {
    /// Create the pipeline. Starts with a single full-target quad.
    pub fn new(context: Arc<GraphicsContext>, config: &ChainConfig) -> Self {
        profile_function!();
        let device = context.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Indexed Char Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/indexed.wgsl").into()),
        });

        let chain = ChainSamplers::from(config);
        let samplers = [
            device.create_sampler(&chain.glyphs.to_descriptor(Some("Glyph Sampler"))),
            device.create_sampler(&chain.attributes.to_descriptor(Some("Attribute Sampler"))),
            device.create_sampler(&chain.palette.to_descriptor(Some("Palette Sampler"))),
            device.create_sampler(&chain.system.to_descriptor(Some("System Palette Sampler"))),
        ];

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Indexed Char Bind Group Layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                sampler_entry(1),
                texture_entry(2, wgpu::TextureViewDimension::D2),
                sampler_entry(3),
                texture_entry(4, wgpu::TextureViewDimension::D2),
                sampler_entry(5),
                texture_entry(6, wgpu::TextureViewDimension::D2),
                sampler_entry(7),
            ],
        });

        let pipeline = create_char_pipeline(
            device,
            "Indexed Char Pipeline",
            &shader,
            &bind_group_layout,
            config.target_format,
            Some(wgpu::BlendState::REPLACE),
        );

        let vertex_buffer = TypedBuffer::new_vertex(
            device,
            Some("Indexed Char Vertex Buffer"),
            &CharQuad::fullscreen().vertices(),
        );

        tracing::debug!("Created indexed char renderer for {:?}", config.target_format);

        Self {
            pipeline,
            bind_group_layout,
            samplers,
            vertex_buffer,
            config: config.clone(),
            context,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Bind the four chain textures. Cache the result while the textures live.
    pub fn create_bind_group(&self, textures: &ChainTextures) -> wgpu::BindGroup {
        let [glyphs, attributes, palette, system] = &self.samplers;
        self.context
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Indexed Char Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: textures.glyphs.as_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(glyphs),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: textures.attributes.as_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(attributes),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: textures.palette.as_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::Sampler(palette),
                    },
                    wgpu::BindGroupEntry {
                        binding: 6,
                        resource: textures.system.as_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 7,
                        resource: wgpu::BindingResource::Sampler(system),
                    },
                ],
            })
    }

    /// Replace the quads drawn by [`draw`](Self::draw).
    pub fn set_quads(&mut self, quads: &[CharQuad]) {
        profile_function!();
        let vertices: Vec<CharVertex> = quads.iter().flat_map(|q| q.vertices()).collect();

        if vertices.len() as u32 <= self.vertex_buffer.capacity() {
            self.vertex_buffer.write(self.context.queue(), &vertices);
        } else {
            tracing::trace!("Growing char vertex buffer to {} vertices", vertices.len());
            self.vertex_buffer = TypedBuffer::new_vertex(
                self.context.device(),
                Some("Indexed Char Vertex Buffer"),
                &vertices,
            );
        }
    }

    /// Number of vertices [`draw`](Self::draw) submits.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_buffer.len()
    }

    /// Record the draw into an existing render pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass, bind_group: &wgpu::BindGroup) {
        if self.vertex_buffer.is_empty() {
            return;
        }
        render_pass.push_debug_group("IndexedCharRenderer::draw");
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        render_pass.draw(0..self.vertex_buffer.len(), 0..1);
        render_pass.pop_debug_group();
    }

    /// Clear `view` to the configured clear color, draw, and submit.
    pub fn render(&self, view: &wgpu::TextureView, bind_group: &wgpu::BindGroup) {
        profile_function!();
        let device = self.context.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Indexed Char Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Indexed Char Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.draw(&mut render_pass, bind_group);
        }

        self.context.queue().submit(Some(encoder.finish()));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}
