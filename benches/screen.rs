//! Terminal benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use virtterm::{Config, Terminal};

fn bench_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let text = "Hello, World! ".repeat(100);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("print_chars", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80, Config::default());
            terminal.write(black_box(text.as_bytes()));
            black_box(terminal.drain_events())
        })
    });

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let lines: String = (0..100)
        .map(|i| format!("Line {}: Some text content here\r\n", i))
        .collect();
    group.throughput(Throughput::Bytes(lines.len() as u64));

    group.bench_function("scroll", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80, Config::default());
            terminal.write(black_box(lines.as_bytes()));
            black_box(terminal.drain_events())
        })
    });

    group.finish();
}

fn bench_csi_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let input = "\x1b[H\x1b[2J\x1b[1;31mHello\x1b[0m\x1b[5;3r\x1b[2L\x1b[r".repeat(100);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("csi_apply", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80, Config::default());
            terminal.write(black_box(input.as_bytes()));
            black_box(terminal.drain_events())
        })
    });

    group.finish();
}

fn bench_cell_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let mut terminal = Terminal::new(24, 80, Config::default());
    terminal.write("\x1b[7mreverse\x1b[0m \x1b[1mbold\x1b[0m ".repeat(100).as_bytes());

    group.bench_function("cell_at_full_screen", |b| {
        b.iter(|| {
            let mut glyphs = 0usize;
            for row in 0..terminal.rows() {
                for col in 0..terminal.columns() {
                    glyphs += usize::from(terminal.cell_at(row, col).ch);
                }
            }
            black_box(glyphs)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_print, bench_scroll, bench_csi_apply, bench_cell_at);

criterion_main!(benches);
