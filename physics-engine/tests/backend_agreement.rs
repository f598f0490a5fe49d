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
//! Cross-back-end agreement: scalar and SIMD must compute the same forces
//! and collision candidates (within floating-point tolerance) for the same
//! input, across a range of problem sizes including ones that don't divide
//! evenly by any kernel width.

use gravity_engine::backend::scalar::ScalarBackend;
use gravity_engine::backend::simd::SimdBackend;
use gravity_engine::backend::ForceBackend;
use gravity_engine::body::{Body, BodyId};
use gravity_engine::store::BodyStore;
use gravity_engine::vector::Vec2;

fn scattered_store(n: usize) -> BodyStore {
    let mut store = BodyStore::new();
    for i in 0..n {
        let angle = i as f64 * 0.913;
        let radius = 50.0 * (i as f64 + 1.0);
        let pos = Vec2::new(radius * angle.cos(), radius * angle.sin());
        let mass = 1e9 * (1.0 + (i % 11) as f64);
        store
            .insert(Body::new(BodyId::new(i as u64 + 1), pos, Vec2::ZERO, mass, 1.0))
            .unwrap();
    }
    store
}

fn assert_forces_close(a: &[Vec2], b: &[Vec2]) {
    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.iter().zip(b.iter()) {
        let scale = fb.x.abs().max(fb.y.abs()).max(1.0);
        assert!((fa.x - fb.x).abs() < 1e-6 * scale, "{fa:?} vs {fb:?}");
        assert!((fa.y - fb.y).abs() < 1e-6 * scale, "{fa:?} vs {fb:?}");
    }
}

#[test]
fn scalar_and_simd_forces_agree_across_sizes() {
    for &n in &[0usize, 1, 2, 3, 7, 8, 9, 15, 16, 17, 31, 32, 33, 64, 97] {
        let store = scattered_store(n);
        let scalar = ScalarBackend.forces(&store);
        let simd = SimdBackend.forces(&store);
        assert_forces_close(&scalar, &simd);
    }
}

#[test]
fn scalar_and_simd_forces_agree_with_a_coincident_pair() {
    // Two bodies at the exact same position must contribute zero force to
    // each other on every back-end, not NaN.
    let mut store = BodyStore::new();
    store.insert(Body::new(BodyId::new(1), Vec2::new(0.0, 0.0), Vec2::ZERO, 1e9, 1.0)).unwrap();
    store.insert(Body::new(BodyId::new(2), Vec2::new(0.0, 0.0), Vec2::ZERO, 1e9, 1.0)).unwrap();
    store.insert(Body::new(BodyId::new(3), Vec2::new(30.0, 40.0), Vec2::ZERO, 1e9, 1.0)).unwrap();
    store.insert(Body::new(BodyId::new(4), Vec2::new(-12.0, 5.0), Vec2::ZERO, 1e9, 1.0)).unwrap();
    store.insert(Body::new(BodyId::new(5), Vec2::new(7.0, -9.0), Vec2::ZERO, 1e9, 1.0)).unwrap();

    let scalar = ScalarBackend.forces(&store);
    let simd = SimdBackend.forces(&store);
    for f in scalar.iter().chain(simd.iter()) {
        assert!(f.x.is_finite() && f.y.is_finite(), "non-finite force: {f:?}");
    }
    assert_forces_close(&scalar, &simd);
}

#[test]
fn scalar_and_simd_collisions_agree() {
    let mut store = BodyStore::new();
    // Three overlapping clusters plus a lone far body.
    store.insert(Body::new(BodyId::new(1), Vec2::new(0.0, 0.0), Vec2::ZERO, 1.0, 5.0)).unwrap();
    store.insert(Body::new(BodyId::new(2), Vec2::new(6.0, 0.0), Vec2::ZERO, 1.0, 5.0)).unwrap();
    store.insert(Body::new(BodyId::new(3), Vec2::new(20.0, 0.0), Vec2::ZERO, 1.0, 5.0)).unwrap();
    store.insert(Body::new(BodyId::new(4), Vec2::new(1000.0, 0.0), Vec2::ZERO, 1.0, 1.0)).unwrap();

    let mut scalar = ScalarBackend.collisions(&store);
    let mut simd = SimdBackend.collisions(&store);
    scalar.sort();
    simd.sort();
    assert_eq!(scalar, simd);
}

#[test]
fn velocities_default_implementation_agrees_across_backends() {
    let store = scattered_store(12);
    let scalar_forces = ScalarBackend.forces(&store);
    let simd_forces = SimdBackend.forces(&store);
    let scalar_vel = ScalarBackend.velocities(&scalar_forces, &store, 2.5);
    let simd_vel = SimdBackend.velocities(&simd_forces, &store, 2.5);
    assert_forces_close(&scalar_vel, &simd_vel);
}
