//! # Entity Store Benchmark
//!
//! Measures the structural operations an archetype registry drives on every
//! spawn, despawn and component add/remove:
//! 1. Merge - absorbing a batch of freshly spawned rows
//! 2. Erase - despawning from the middle of a large store
//! 3. Extract - relocating one entity to another archetype

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tessera_core::{EntityStore, Position, Velocity};

const ENTITY_COUNT: usize = 100_000;
const BATCH: usize = 1_000;

fn pv_store(count: usize) -> EntityStore {
    EntityStore::builder()
        .with_pod_component((0..count).map(|i| Position::new(i as f32, 0.0, 0.0)).collect())
        .with_pod_component(vec![Velocity::new(0.1, 0.2, 0.3); count])
        .build()
        .unwrap_or_else(|err| panic!("bench store: {err}"))
}

/// Generate deterministic "random" indices
fn generate_random_indices(count: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    (0..count)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            // Each step removes one row, so the valid range shrinks
            (state as usize) % (max - i)
        })
        .collect()
}

fn bench_merge_batch(c: &mut Criterion) {
    c.bench_function("merge_1k_into_100k", |b| {
        b.iter_batched(
            || (pv_store(ENTITY_COUNT), pv_store(BATCH)),
            |(mut target, mut batch)| {
                target
                    .insert(&mut batch)
                    .unwrap_or_else(|err| panic!("merge: {err}"));
                black_box(target.len())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_erase_random(c: &mut Criterion) {
    let indices = generate_random_indices(BATCH, ENTITY_COUNT, 0xDEAD_BEEF);

    c.bench_function("erase_1k_random_from_100k", |b| {
        b.iter_batched(
            || pv_store(ENTITY_COUNT),
            |mut store| {
                for &index in &indices {
                    store
                        .erase(index)
                        .unwrap_or_else(|err| panic!("erase: {err}"));
                }
                black_box(store.len())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_extract_random(c: &mut Criterion) {
    let indices = generate_random_indices(BATCH, ENTITY_COUNT, 0xC0FF_EE00);

    c.bench_function("extract_1k_random_from_100k", |b| {
        b.iter_batched(
            || pv_store(ENTITY_COUNT),
            |mut store| {
                let mut moved = 0;
                for &index in &indices {
                    let single = store
                        .extract(index)
                        .unwrap_or_else(|err| panic!("extract: {err}"));
                    moved += single.len();
                }
                black_box(moved)
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_type_hash(c: &mut Criterion) {
    let store = pv_store(1);
    c.bench_function("hash_types_pv", |b| b.iter(|| black_box(store.hash_types())));
}

criterion_group!(
    benches,
    bench_merge_batch,
    bench_erase_random,
    bench_extract_random,
    bench_type_hash,
);
criterion_main!(benches);
