// Copyright 2025 Gravity Engine Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks comparing the scalar and SIMD force back-ends.
//!
//! Measures raw throughput of `forces()` across problem sizes, and the
//! overhead of collision-candidate detection on a clustered scene.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gravity_engine::backend::scalar::ScalarBackend;
use gravity_engine::backend::simd::SimdBackend;
use gravity_engine::backend::ForceBackend;
use gravity_engine::body::{Body, BodyId};
use gravity_engine::store::BodyStore;
use gravity_engine::vector::Vec2;

fn spiral_store(n: usize) -> BodyStore {
    let mut store = BodyStore::new();
    for i in 0..n {
        let angle = i as f64 * 0.618_034;
        let radius = 1.0e7 * (i as f64 + 1.0).sqrt();
        let pos = Vec2::new(radius * angle.cos(), radius * angle.sin());
        let mass = 1.0e20 * (1.0 + (i % 7) as f64);
        store
            .insert(Body::new(BodyId::new(i as u64 + 1), pos, Vec2::ZERO, mass, 1.0e5))
            .unwrap();
    }
    store
}

fn bench_forces_by_backend(c: &mut Criterion) {
    let mut group = c.benchmark_group("forces");

    for &n in &[16usize, 64, 256, 1024] {
        let store = spiral_store(n);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, _| {
            b.iter(|| black_box(ScalarBackend.forces(&store)));
        });

        group.bench_with_input(BenchmarkId::new("simd", n), &n, |b, _| {
            b.iter(|| black_box(SimdBackend.forces(&store)));
        });
    }

    group.finish();
}

fn bench_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("collisions");

    for &n in &[64usize, 256, 1024] {
        let mut store = BodyStore::new();
        for i in 0..n {
            // Tight packing so every back-end actually has overlaps to find.
            let pos = Vec2::new((i as f64) * 2.0, 0.0);
            store
                .insert(Body::new(BodyId::new(i as u64 + 1), pos, Vec2::ZERO, 1.0, 3.0))
                .unwrap();
        }
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, _| {
            b.iter(|| black_box(ScalarBackend.collisions(&store)));
        });

        group.bench_with_input(BenchmarkId::new("simd", n), &n, |b, _| {
            b.iter(|| black_box(SimdBackend.collisions(&store)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forces_by_backend, bench_collisions);
criterion_main!(benches);
