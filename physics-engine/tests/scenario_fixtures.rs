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
//! 32-satellite solar-system fixture: one Earth-mass body at the origin and
//! 31 satellites spaced along the x-axis with alternating-sign velocity.
//! Forces and derived velocities are checked against literal reference
//! values.

use gravity_engine::backend::scalar::ScalarBackend;
use gravity_engine::backend::ForceBackend;
use gravity_engine::body::{Body, BodyId};
use gravity_engine::store::BodyStore;
use gravity_engine::vector::Vec2;

const FORCES_X_EXPECTED: [f64; 32] = [
    3.1977106592602337e+22,
    -1.9429197577020984e+22,
    -4.8065843588514269e+21,
    -2.1147361367259475e+21,
    -1.1785555714733748e+21,
    -7.481275555246485e+20,
    -5.1596896505853641e+20,
    -3.7704938284029418e+20,
    -2.8763535564313146e+20,
    -2.2690239711976148e+20,
    -1.8391954969492822e+20,
    -1.5250834966890257e+20,
    -1.2896706684640454e+20,
    -1.109726090798039e+20,
    -9.7010368315513635e+19,
    -8.6062944454120047e+19,
    -7.7430705052729737e+19,
    -7.0625273434563674e+19,
    -6.5303584379569701e+19,
    -6.1228301705822601e+19,
    -5.8243224393434006e+19,
    -5.6260585026228322e+19,
    -5.5258270226347721e+19,
    -5.5288229719181361e+19,
    -5.6501263723501978e+19,
    -5.9202398755087188e+19,
    -6.3972511204937564e+19,
    -7.1953976062126326e+19,
    -8.5618952862731076e+19,
    -1.1131000081985674e+20,
    -1.7100750086483843e+20,
    -4.1369798775797501e+20,
];

const VELOCITIES1_X_EXPECTED: [f64; 32] = [
    0.0053530712611973286,
    -0.26442655920982361,
    -0.065416418015956879,
    -0.02878103218972683,
    -0.016039848327636719,
    -0.010181830264627934,
    -0.0070222094655036926,
    -0.0051315482705831528,
    -0.0039146458730101585,
    -0.003088085213676095,
    -0.0025030993856489658,
    -0.0020756006706506014,
    -0.0017552097560837865,
    -0.0015103096375241876,
    -0.0013202870031818748,
    -0.0011712952982634306,
    -0.0010538126807659864,
    -0.00096119241788983345,
    -0.00088876555673778057,
    -0.00083330197958275676,
    -0.00079267582623288035,
    -0.00076569255907088518,
    -0.00075205130269750953,
    -0.00075245904736220837,
    -0.00076896813698112965,
    -0.00080572994193062186,
    -0.0008706499938853085,
    -0.00097927567549049854,
    -0.0011652526445686817,
    -0.0015149014070630074,
    -0.0023273695260286331,
    -0.0056303269229829311,
];

fn solar_system() -> BodyStore {
    let mut store = BodyStore::new();
    store
        .insert(Body::new(BodyId::new(1), Vec2::new(0.0, 0.0), Vec2::ZERO, 5.9736e24, 6371e3))
        .unwrap();
    for i in 1..32u64 {
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        store
            .insert(Body::new(
                BodyId::new(i + 1),
                Vec2::new(38_440_000.0 * i as f64, 0.0),
                Vec2::new(0.0, 1022.0 * sign),
                7.347673e22,
                1_737_100.0,
            ))
            .unwrap();
    }
    store
}

/// Relative-tolerance float comparison; the literal fixture values were
/// transcribed from an independent implementation, so exact bit equality
/// isn't expected, only agreement to double-precision rounding.
fn assert_close(actual: f64, expected: f64, label: &str) {
    let scale = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff < 1e-9 * scale,
        "{label}: expected {expected}, got {actual} (relative diff {})",
        diff / scale
    );
}

#[test]
fn scenario_a_forces_match_reference_vector() {
    let store = solar_system();
    let forces = ScalarBackend.forces(&store);
    assert_eq!(forces.len(), 32);
    for (i, f) in forces.iter().enumerate() {
        assert_close(f.x, FORCES_X_EXPECTED[i], &format!("forces[{i}].x"));
        assert_eq!(f.y, 0.0, "forces[{i}].y must be exactly zero by symmetry");
    }
}

#[test]
fn scenario_b_zero_dt_velocities_are_zero() {
    let store = solar_system();
    let backend = ScalarBackend;
    let forces = backend.forces(&store);
    let velocities = backend.velocities(&forces, &store, 0.0);
    for v in velocities {
        assert_eq!(v, Vec2::ZERO);
    }
}

#[test]
fn scenario_c_velocities_at_unit_dt_match_reference_vector() {
    let store = solar_system();
    let backend = ScalarBackend;
    let forces = backend.forces(&store);
    let velocities = backend.velocities(&forces, &store, 1.0);
    for (i, v) in velocities.iter().enumerate() {
        assert_close(v.x, VELOCITIES1_X_EXPECTED[i], &format!("velocities[{i}].x"));
        assert_eq!(v.y, 0.0);
    }
}
