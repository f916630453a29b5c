//! Contract replay benchmarks.
//!
//! Run with: cargo bench --bench replay

use contract_duel::contract::ContractEngine;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Helper functions to generate contracts
// ============================================================================

/// A contract of `n` lines cycling through cheap arithmetic on all three
/// variables.
fn generate_contract(n: usize) -> ContractEngine {
    const LINES: [&str; 6] = ["x += 1", "y = x - y", "z = z * 3 % 1000", "x //= 2", "y += z", "z -= x"];

    let mut engine = ContractEngine::new();
    for i in 0..n {
        let appended = engine.append_line(LINES[i % LINES.len()]);
        assert!(appended, "bench contract line {i} rejected");
    }
    engine
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for size in [10, 100, 1000] {
        let mut engine = generate_contract(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.replay()));
        });
    }

    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_line");

    for size in [10, 100, 1000] {
        let engine = generate_contract(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &engine, |b, engine| {
            b.iter(|| {
                let mut engine = engine.clone();
                black_box(engine.append_line("x = x + y"))
            });
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let engine = generate_contract(1000);
    c.bench_function("snapshot_1000", |b| b.iter(|| black_box(engine.snapshot())));
}

criterion_group!(benches, bench_replay, bench_append, bench_snapshot);
criterion_main!(benches);
