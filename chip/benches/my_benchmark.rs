use chip::chip8::ChipSet;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// V0 += 1, I = glyph of V0, draw it at (V1, V2), clear, jump back
const LOOP_ROM: [u8; 10] = [0x70, 0x01, 0xF0, 0x29, 0xD1, 0x25, 0x00, 0xE0, 0x12, 0x00];

/// will setup the default configured chip
fn setup_chip() -> ChipSet {
    let mut chip = ChipSet::new();
    let _ = chip.load(&LOOP_ROM);
    chip
}

pub fn advance_bench(c: &mut Criterion) {
    let mut chip = setup_chip();
    c.bench_function("advance_frame", |b| {
        b.iter(|| {
            chip.advance(black_box(16.67));
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let mut chip = setup_chip();
    chip.advance(100.0);
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", chip);
        });
    });
}

criterion_group!(benches, advance_bench, print_bench);
criterion_main!(benches);
