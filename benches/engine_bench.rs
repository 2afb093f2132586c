//! Benchmarks for syntux
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

fn benchmark_builtin_engine(c: &mut Criterion) {
    use syntux::models::{EffectiveConfig, OverrideMap, Plugin, merge_config};
    use syntux::services::{BuiltinEngine, TransformEngine};

    let mut overrides = OverrideMap::new();
    overrides.set(Plugin::Indent, json!(2));
    overrides.set(Plugin::TrailingWhitespace, json!(true));
    overrides.set(Plugin::LineEndings, json!("lf"));
    overrides.set(Plugin::FinalNewline, json!(true));
    let config: EffectiveConfig = merge_config(None, &overrides);

    let source = "function f(a, b) {\t\r\n\tif (a) {  \r\n\t\treturn b;\r\n\t}\r\n}\r\n".repeat(200);
    let engine = BuiltinEngine::new();

    c.bench_function("builtin_engine_all_plugins", |b| {
        b.iter(|| {
            let out = engine.transform(black_box(&source), &config).unwrap();
            black_box(out);
        })
    });

    let empty = EffectiveConfig::default();
    c.bench_function("builtin_engine_no_plugins", |b| {
        b.iter(|| {
            let out = engine.transform(black_box(&source), &empty).unwrap();
            black_box(out);
        })
    });
}

fn benchmark_merge_config(c: &mut Criterion) {
    use syntux::models::{ConfigMap, OverrideMap, merge_config};

    c.bench_function("merge_config", |b| {
        let mut file = ConfigMap::new();
        for i in 0..32 {
            file.insert(format!("plugin_{i}"), json!({"level": i}));
        }
        let overrides: OverrideMap = (0..8).map(|i| (format!("plugin_{i}"), json!(i))).collect();

        b.iter(|| {
            let merged = merge_config(Some(black_box(file.clone())), &overrides);
            black_box(merged);
        })
    });
}

criterion_group!(benches, benchmark_builtin_engine, benchmark_merge_config);
criterion_main!(benches);
