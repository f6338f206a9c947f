use criterion::{black_box, criterion_group, criterion_main, Criterion};
use circuitview::prelude::*;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A flat circuit of `n` four-terminal devices sharing a handful of nets
fn synthetic_flat(n: usize) -> Value {
    let mut components = Map::new();
    for i in 0..n {
        components.insert(
            format!("M{}", i),
            json!({
                "type": if i % 2 == 0 { "nfet" } else { "pfet" },
                "pair_id": i / 2,
                "parameters": {"l": 4.5e-8, "nfin": 4},
                "terminals": [
                    {"terminal": "D", "net": format!("n{}", i)},
                    {"terminal": "G", "net": format!("n{}", (i + 1) % n)},
                    {"terminal": "S", "net": "gnd!"},
                    {"terminal": "B", "net": "gnd!"}
                ]
            }),
        );
    }
    let mut nets = Map::new();
    for i in 0..n {
        nets.insert(format!("n{}", i), json!({"type": "internal"}));
    }
    nets.insert("gnd!".to_string(), json!({"type": "ground"}));

    json!({"components": components, "nets": nets})
}

fn bench_open_fixture(c: &mut Criterion) {
    c.bench_function("open_flat_fixture", |b| {
        b.iter(|| CircuitView::open(black_box(&fixture_path("flat_circuit.json"))));
    });
}

fn bench_normalize_large(c: &mut Criterion) {
    let payload = CircuitPayload::from_value(synthetic_flat(2000)).unwrap();
    c.bench_function("normalize_2000_devices", |b| {
        b.iter(|| normalize(black_box(&payload)));
    });
}

fn bench_format_param(c: &mut Criterion) {
    c.bench_function("format_param", |b| {
        b.iter(|| {
            format_param(black_box("c"), black_box(2.5e-12));
            format_param(black_box("w"), black_box("120n"));
        });
    });
}

criterion_group!(benches, bench_open_fixture, bench_normalize_large, bench_format_param);
criterion_main!(benches);
