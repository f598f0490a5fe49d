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
//! Single-threaded reference back-end. Used as the correctness baseline that
//! every other back-end is compared against, and as the fallback when no
//! SIMD instruction set is available.

use super::{collisions_sequential_range, pairwise_force, CollisionPair, ForceBackend};
use crate::store::BodyStore;
use crate::vector::Vec2;

/// Double-nested-loop scalar force computation, one thread, Newton's-third-law
/// halving: a pair `(i, j)` with `i < j` is visited once and its force is
/// added to `i`'s accumulator and subtracted from `j`'s.
pub struct ScalarBackend;

impl ForceBackend for ScalarBackend {
    fn name(&self) -> &str {
        "scalar"
    }

    fn forces(&self, store: &BodyStore) -> Vec<Vec2> {
        let n = store.len();
        let x = store.x();
        let y = store.y();
        let mass = store.mass();
        let mut forces = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let f = pairwise_force(x[i], y[i], mass[i], x[j], y[j], mass[j]);
                forces[i] += f;
                forces[j] += -f;
            }
        }
        forces
    }

    fn collisions(&self, store: &BodyStore) -> Vec<CollisionPair> {
        collisions_sequential_range(store, 0..store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyId};

    fn linear_store(masses: &[f64], positions: &[f64]) -> BodyStore {
        let mut store = BodyStore::new();
        for (i, (&m, &p)) in masses.iter().zip(positions.iter()).enumerate() {
            store
                .insert(Body::new(BodyId(i as u64 + 1), Vec2::new(p, 0.0), Vec2::ZERO, m, 1.0))
                .unwrap();
        }
        store
    }

    #[test]
    fn forces_on_two_bodies_are_antisymmetric() {
        let store = linear_store(&[1e10, 1e10], &[0.0, 10.0]);
        let f = ScalarBackend.forces(&store);
        assert!((f[0].x + f[1].x).abs() < 1e-6);
        assert_eq!(f[0].y, 0.0);
    }

    #[test]
    fn forces_on_single_body_is_zero() {
        let store = linear_store(&[1.0], &[0.0]);
        let f = ScalarBackend.forces(&store);
        assert_eq!(f[0], Vec2::ZERO);
    }

    #[test]
    fn velocities_at_zero_dt_is_zero() {
        let store = linear_store(&[1e10, 1e10], &[0.0, 10.0]);
        let backend = ScalarBackend;
        let f = backend.forces(&store);
        let v = backend.velocities(&f, &store, 0.0);
        for vi in v {
            assert_eq!(vi, Vec2::ZERO);
        }
    }

    #[test]
    fn velocities_scale_linearly_with_dt() {
        let store = linear_store(&[1e10, 1e10], &[0.0, 10.0]);
        let backend = ScalarBackend;
        let f = backend.forces(&store);
        let v1 = backend.velocities(&f, &store, 1.0);
        let v2 = backend.velocities(&f, &store, 2.0);
        for (a, b) in v1.iter().zip(v2.iter()) {
            assert!((b.x - a.x * 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn collisions_detects_overlap() {
        let store = linear_store(&[1.0, 1.0], &[0.0, 1.5]);
        let pairs = ScalarBackend.collisions(&store);
        assert_eq!(pairs, vec![(0, 1)]);
    }
}
