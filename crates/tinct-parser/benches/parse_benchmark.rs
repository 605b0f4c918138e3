//! Parser benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinct_core::ResolveOptions;
use tinct_parser::{parse_color_value, tokenize};

const LITERALS: &[&str] = &[
    "rebeccapurple",
    "#00800080",
    "rgb(255 0 0 / 50%)",
    "hsl(120deg, 50%, 25%)",
    "oklch(0.7 0.15 120)",
    "color(display-p3 0.4 0.2 0.6 / 0.8)",
];

fn tokenize_literals(c: &mut Criterion) {
    c.bench_function("tokenize_literals", |b| {
        b.iter(|| {
            for literal in LITERALS {
                tokenize(black_box(literal));
            }
        })
    });
}

fn parse_literals(c: &mut Criterion) {
    let opts = ResolveOptions::default();
    c.bench_function("parse_literals", |b| {
        b.iter(|| {
            for literal in LITERALS {
                let _ = parse_color_value(black_box(literal), &opts);
            }
        })
    });
}

criterion_group!(benches, tokenize_literals, parse_literals);
criterion_main!(benches);
