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
//! A body's identifier survives any number of unrelated erases, even though
//! its index keeps changing underneath it via the store's swap-pop.

use gravity_engine::backend::scalar::ScalarBackend;
use gravity_engine::backend::ForceBackend;
use gravity_engine::body::{Body, BodyId};
use gravity_engine::collision::resolve_collisions;
use gravity_engine::events::EventBus;
use gravity_engine::store::BodyStore;
use gravity_engine::vector::Vec2;

#[test]
fn surviving_body_id_resolves_through_repeated_erases() {
    let mut store = BodyStore::new();
    for i in 0..6u64 {
        store
            .insert(Body::new(
                BodyId::new(100 + i),
                Vec2::new(i as f64 * 10.0, 0.0),
                Vec2::ZERO,
                1.0,
                1.0,
            ))
            .unwrap();
    }

    let watched = BodyId::new(103);
    assert_eq!(store.id_to_index(watched), Some(3));

    store.erase(0);
    store.erase(1);
    // index 3 is long gone from under the watched body, but the id still
    // resolves to wherever swap-pop left it.
    let idx = store.id_to_index(watched).expect("watched body still present");
    assert_eq!(store.get(idx).id, watched);

    store.erase(0);
    let idx = store.id_to_index(watched).expect("watched body still present");
    assert_eq!(store.get(idx).id, watched);
}

#[test]
fn merged_body_id_disappears_while_survivor_id_persists() {
    let mut store = BodyStore::new();
    store
        .insert(Body::new(BodyId::new(1), Vec2::new(0.0, 0.0), Vec2::ZERO, 1.0, 1.0))
        .unwrap();
    store
        .insert(Body::new(BodyId::new(2), Vec2::new(1.0, 0.0), Vec2::ZERO, 5.0, 1.0))
        .unwrap();
    store
        .insert(Body::new(BodyId::new(3), Vec2::new(50.0, 0.0), Vec2::ZERO, 1.0, 1.0))
        .unwrap();

    let mut bus = EventBus::new();
    let pairs = ScalarBackend.collisions(&store);
    resolve_collisions(&mut store, &pairs, &mut bus);

    assert_eq!(store.len(), 2);
    assert_eq!(store.id_to_index(BodyId::new(1)), None, "absorbed body's id must not resolve");
    let survivor_idx = store.id_to_index(BodyId::new(2)).expect("heavier body survives");
    assert_eq!(store.get(survivor_idx).mass, 6.0);
    assert!(store.id_to_index(BodyId::new(3)).is_some(), "untouched body keeps its id");
}
