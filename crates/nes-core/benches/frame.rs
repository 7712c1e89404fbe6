//! Frame generator throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nes_core::memory::{FRAME_BUFFER_SIZE, PALETTE_SIZE};
use nes_core::palette::{self, PaletteKind};
use nes_core::render::{render_frame, FrameInputs, MapperClass, RenderScheme};

fn bench_render(c: &mut Criterion) {
    let mut table = [0u8; PALETTE_SIZE];
    palette::fill(PaletteKind::Canonical, &mut table);
    let mut frame = vec![0u8; FRAME_BUFFER_SIZE];

    for (name, scheme, mapper_class) in [
        ("palette", RenderScheme::Palette, MapperClass::Standard),
        ("palette_unrom", RenderScheme::Palette, MapperClass::UnromChrRam),
        ("linear", RenderScheme::Linear, MapperClass::Standard),
    ] {
        let mut frame_count = 0u32;
        c.bench_function(name, |b| {
            b.iter(|| {
                frame_count = frame_count.wrapping_add(1);
                let inputs = FrameInputs {
                    frame_count,
                    controls: 0x81,
                    mapper_class,
                };
                render_frame(scheme, black_box(&mut frame), &table, &inputs);
            })
        });
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
