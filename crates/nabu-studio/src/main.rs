use anyhow::{Context, Result, ensure};
use nabu_engine::batch::RenderBuffer;
use nabu_engine::device::{DeviceCall, DeviceCaps, RecordingDevice};
use nabu_engine::logging::{LoggingConfig, init_logging};
use nabu_engine::render::RenderCtx;
use nabu_engine::state::{AlphaFunc, BlendFactor, PrimitiveMode, StateCache, TextureHandle};

const ATLAS: TextureHandle = TextureHandle::new(1);
const GLYPHS: TextureHandle = TextureHandle::new(2);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let frames = frame_count()?;
    let caps = DeviceCaps {
        multi_draw: std::env::var_os("NABU_NO_MULTI_DRAW").is_none(),
        compiled_arrays: true,
    };

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║         NABU BATCH STUDIO v0.1         ║");
    println!("  ║   immediate geometry  ·  draw batching ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let mut device = RecordingDevice::with_caps(caps);
    let mut cache = StateCache::new();
    let mut buffer = RenderBuffer::new();

    for frame in 0..frames {
        build_scene(&mut buffer, frame);

        let stats = buffer.stats();
        {
            let mut ctx = RenderCtx::new(&mut device, &mut cache);
            buffer.render(&mut ctx);
        }
        buffer.reset();

        let calls = device.take_calls();
        let draws = calls.iter().filter(|c| c.is_draw()).count();
        ensure!(draws > 0, "frame {frame} issued no draw calls");

        for call in &calls {
            log::debug!("frame {frame}: {call:?}");
        }

        let state_calls = calls
            .iter()
            .filter(|c| !c.is_draw() && !is_array_call(c))
            .count();

        log::info!(
            "frame {frame}: {} sets in {} runs -> {draws} draws, {state_calls} state changes",
            stats.sets,
            stats.runs,
        );
    }

    Ok(())
}

fn frame_count() -> Result<u32> {
    match std::env::var("NABU_FRAMES") {
        Ok(v) => v
            .parse()
            .with_context(|| format!("NABU_FRAMES must be a frame count, got {v:?}")),
        Err(_) => Ok(2),
    }
}

fn is_array_call(call: &DeviceCall) -> bool {
    matches!(
        call,
        DeviceCall::BindVertexArrays { .. }
            | DeviceCall::UnbindVertexArrays
            | DeviceCall::LockArrayRange { .. }
            | DeviceCall::UnlockArrayRange
    )
}

/// Tiles, a translucent overlay, alpha-tested glyphs and a wireframe border.
fn build_scene(buffer: &mut RenderBuffer, frame: u32) {
    let shift = frame as f32 * 4.0;

    // ── tiles ─────────────────────────────────────────────────────────────
    buffer.set_texture(ATLAS);
    buffer.set_mode(PrimitiveMode::Quads);
    buffer.set_blend_func(BlendFactor::One, BlendFactor::Zero);
    buffer.set_alpha_func(AlphaFunc::Always, 0.0);
    for row in 0..4 {
        for col in 0..8 {
            let (x, y) = (col as f32 * 32.0 + shift, row as f32 * 32.0);
            buffer.add_vertices(&quad(x, y, 32.0, 32.0), Some(&QUAD_UV), None);
        }
    }

    // ── overlay ───────────────────────────────────────────────────────────
    buffer.set_texture(TextureHandle::NONE);
    buffer.set_blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
    buffer.add_vertices(&quad(0.0, 0.0, 256.0, 128.0), None, Some(&[[0, 0, 0, 96]; 4]));

    // ── glyphs ────────────────────────────────────────────────────────────
    buffer.set_texture(GLYPHS);
    buffer.set_alpha_func(AlphaFunc::Greater, 0.5);
    for i in 0..12 {
        let x = 8.0 + i as f32 * 10.0;
        let glyph = quad(x, 140.0, 8.0, 12.0);
        buffer.add_vertices(&glyph, Some(&QUAD_UV), Some(&[[255, 220, 120, 255]; 4]));
    }

    // ── border ────────────────────────────────────────────────────────────
    buffer.set_texture(TextureHandle::NONE);
    buffer.set_alpha_func(AlphaFunc::Always, 0.0);
    buffer.set_blend_func(BlendFactor::One, BlendFactor::Zero);
    buffer.set_mode(PrimitiveMode::LineLoop);
    buffer.set_line_width(2.0);
    buffer.add_vertices(&quad(0.0, 0.0, 256.0, 160.0), None, Some(&[[90, 200, 255, 255]; 4]));
}

const QUAD_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

fn quad(x: f32, y: f32, w: f32, h: f32) -> [[f32; 3]; 4] {
    [[x, y, 0.0], [x + w, y, 0.0], [x + w, y + h, 0.0], [x, y + h, 0.0]]
}
