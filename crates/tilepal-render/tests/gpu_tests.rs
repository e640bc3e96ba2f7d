//! GPU pipeline tests. They need an adapter:
//! `cargo test -p tilepal-render --test gpu_tests -- --ignored`

use std::sync::Arc;

use tilepal_render::*;
use tilepal_test_utils::{compare_framebuffers, fixtures, fixtures::scenario, gpu_context};

fn render_on_gpu(ctx: &Arc<GraphicsContext>, tables: &ChainTables, config: &ChainConfig, size: Size<u32>) -> Framebuffer {
    let renderer = IndexedCharRenderer::new(ctx.clone(), config);
    let textures = ChainTextures::upload(ctx, tables);
    let bind_group = renderer.create_bind_group(&textures);
    let target = OffscreenTarget::new(ctx.clone(), size);

    renderer.render(target.view(), &bind_group);
    target.read_framebuffer().unwrap()
}

#[test]
#[ignore] // Requires GPU
fn test_context_creation() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    assert_eq!(Arc::strong_count(&ctx), 1);
    assert!(ctx.limits().max_texture_dimension_2d >= 64);

    let ctx2 = ctx.clone();
    assert_eq!(Arc::strong_count(&ctx), 2);
    drop(ctx2);

    let weak = Arc::downgrade(&ctx);
    drop(ctx);
    assert!(weak.upgrade().is_none());
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_scenario_matches_software() {
    tilepal_test_utils::init_test_logging();
    let Some(ctx) = gpu_context() else {
        return;
    };
    let config = ChainConfig::default();
    let tables = scenario::tables();
    let size = Size::new(10, 10);

    let gpu = render_on_gpu(&ctx, &tables, &config, size);
    assert_eq!(gpu.pixel(2, 3), scenario::expected_color());

    let cpu = render_fullscreen(size, &IndexedLookup::from_config(tables, &config));
    let diff = compare_framebuffers(&cpu, &gpu, 0);
    assert!(diff.is_match(), "{diff:?}");
}

#[test]
#[ignore] // Requires GPU
fn test_palette_tables_upload_as_single_rows() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let textures = ChainTextures::upload(&ctx, &scenario::tables());

    for (texture, width) in [(&textures.palette, 16), (&textures.system, 64)] {
        assert_eq!(texture.texture().dimension(), wgpu::TextureDimension::D2);
        assert_eq!(texture.width(), width);
        assert_eq!(texture.height(), 1);
    }
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_nes_tables_match_software() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let mut palette_ram = [0u8; 32];
    palette_ram[0] = 0x0F;
    for (slot, entry) in palette_ram.iter_mut().enumerate().skip(1).take(15) {
        *entry = (slot as u8 * 4 + 1) & 0x3F;
    }
    let tables = ChainTables {
        palette: nes::palette_ram_table(&palette_ram),
        system: SystemPalette::nes(),
        ..fixtures::diagonal_tables()
    };
    let config = ChainConfig::default();
    let size = Size::new(16, 16);

    let gpu = render_on_gpu(&ctx, &tables, &config, size);
    let cpu = render_fullscreen(size, &IndexedLookup::from_config(tables, &config));
    let diff = compare_framebuffers(&cpu, &gpu, 0);
    assert!(diff.is_match(), "{diff:?}");
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_diagonal_matches_software() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let config = ChainConfig::default();
    let tables = fixtures::diagonal_tables();
    let size = Size::new(32, 32);

    let gpu = render_on_gpu(&ctx, &tables, &config, size);
    let cpu = render_fullscreen(size, &IndexedLookup::from_config(tables, &config));
    let diff = compare_framebuffers(&cpu, &gpu, 0);
    assert!(diff.is_match(), "{diff:?}");
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_last_slot_clamps() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let gpu = render_on_gpu(
        &ctx,
        &fixtures::uniform_tables(3, 3),
        &ChainConfig::default(),
        Size::new(4, 4),
    );
    assert!(gpu.pixels().iter().all(|p| *p == fixtures::ramp_color(45)));
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_table_update() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let config = ChainConfig::default();
    let renderer = IndexedCharRenderer::new(ctx.clone(), &config);
    let mut tables = fixtures::uniform_tables(1, 0);
    let textures = ChainTextures::upload(&ctx, &tables);
    let bind_group = renderer.create_bind_group(&textures);
    let target = OffscreenTarget::new(ctx.clone(), Size::new(4, 4));

    tables.attributes = AttributeTable::uniform(tables.attributes.size(), 2).unwrap();
    assert!(textures.update(&ctx, &tables));
    renderer.render(target.view(), &bind_group);

    // raw 1 under sub-palette 2 is slot 9, holding 27
    let frame = target.read_framebuffer().unwrap();
    assert!(frame.pixels().iter().all(|p| *p == fixtures::ramp_color(27)));
}

#[test]
#[ignore] // Requires GPU
fn test_gpu_blit_is_identity() {
    let Some(ctx) = gpu_context() else {
        return;
    };
    let size = Size::new(4, 4);
    let texels: Vec<Rgba8> = (0..16u8).map(|i| Rgba8::new(i * 16, 255 - i, i * 3, 255)).collect();
    let image = RgbaImage::new(size, texels.clone()).unwrap();
    let source = upload_image(&ctx, &image);

    let blit = BlitRenderer::new(ctx.clone(), OffscreenTarget::FORMAT);
    let target = OffscreenTarget::new(ctx.clone(), size);

    let mut encoder = ctx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blit test"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view(),
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        blit.blit(&mut pass, source.view());
    }
    ctx.queue().submit(Some(encoder.finish()));

    let frame = target.read_framebuffer().unwrap();
    assert_eq!(frame.pixels(), texels.as_slice());
}
