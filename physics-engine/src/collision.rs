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
//! Collision resolution: merges overlapping body pairs detected against
//! pre-tick geometry.
//!
//! Candidate pairs are resolved in listed order; a body already absorbed
//! this tick is skipped rather than merged again, so a chain of three or
//! more mutually overlapping bodies converges to exactly one survivor per
//! tick instead of cascading. The heavier body of each pair survives (ties
//! go to the lower index); momentum and volume are conserved. Absorbed
//! indices are erased in descending order at the end of the pass — `erase`
//! is swap-pop, so erasing low-to-high would silently redirect a still-
//! pending removal onto the wrong body.

use std::collections::BTreeSet;

use crate::backend::CollisionPair;
use crate::body::Body;
use crate::events::EventBus;
use crate::store::BodyStore;

/// Resolves every candidate pair against `store`, emitting `collided` and
/// `annihilated` events on `bus`, then erases absorbed bodies.
pub fn resolve_collisions(store: &mut BodyStore, pairs: &[CollisionPair], bus: &mut EventBus) {
    let mut removed: BTreeSet<usize> = BTreeSet::new();

    for &(i, j) in pairs {
        if removed.contains(&i) || removed.contains(&j) {
            continue;
        }
        let absorbed_idx = merge_pair(store, bus, i, j);
        removed.insert(absorbed_idx);
    }

    for idx in removed.into_iter().rev() {
        store.erase(idx);
    }
}

/// Merges the pair at indices `i, j` (the heavier survives, tie to the lower
/// index), writes the result onto the survivor's row, and returns the
/// absorbed index.
fn merge_pair(store: &mut BodyStore, bus: &mut EventBus, i: usize, j: usize) -> usize {
    let bi = store.get(i);
    let bj = store.get(j);

    let (heavy_idx, heavy, light_idx, light) = if bi.mass >= bj.mass {
        (i, bi, j, bj)
    } else {
        (j, bj, i, bi)
    };

    let new_mass = heavy.mass + light.mass;
    let new_radius = (heavy.radius.powi(3) + light.radius.powi(3)).cbrt();
    let new_vel = (heavy.vel * heavy.mass + light.vel * light.mass) / new_mass;

    store.set_mass(heavy_idx, new_mass);
    store.set_radius(heavy_idx, new_radius);
    store.set_velocity(heavy_idx, new_vel);

    let survivor: Body = store.get(heavy_idx);
    bus.emit_collided(survivor, light);
    bus.emit_annihilated(light);

    light_idx
}
