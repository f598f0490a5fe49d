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
//! Body value type and its stable identifier.

use crate::vector::Vec2;

/// Stable identifier for a body, assigned monotonically by the store that owns it.
///
/// `0` is reserved and never assigned to a real body; it is useful as an
/// "invalid" sentinel for callers that need one (e.g. uninitialized scene state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    /// The reserved "no body" identifier.
    pub const INVALID: BodyId = BodyId(0);

    /// Construct an identifier from a raw value.
    ///
    /// The store assigns identifiers monotonically during normal operation;
    /// this constructor exists for callers (tests, benchmark drivers, scene
    /// replay) that need to name a specific identifier directly.
    pub fn new(value: u64) -> Self {
        BodyId(value)
    }

    /// Raw numeric value of the identifier.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the reserved invalid identifier.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A materialized snapshot of one body's state.
///
/// Produced by [`crate::store::BodyStore::get`]; cheap to copy, not a live view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Stable identifier.
    pub id: BodyId,
    /// Position.
    pub pos: Vec2,
    /// Velocity.
    pub vel: Vec2,
    /// Mass, strictly positive.
    pub mass: f64,
    /// Radius, strictly positive, used only for collision detection.
    pub radius: f64,
}

impl Body {
    /// Construct a body, panicking if mass or radius is non-positive or non-finite.
    ///
    /// Use [`Body::try_new`] at a system boundary where the caller's input is not
    /// already known-good.
    pub fn new(id: BodyId, pos: Vec2, vel: Vec2, mass: f64, radius: f64) -> Self {
        Self::try_new(id, pos, vel, mass, radius).expect("invalid body parameters")
    }

    /// Construct a body, returning `None` if mass or radius is non-positive or non-finite.
    pub fn try_new(id: BodyId, pos: Vec2, vel: Vec2, mass: f64, radius: f64) -> Option<Self> {
        if !(mass.is_finite() && mass > 0.0 && radius.is_finite() && radius > 0.0) {
            return None;
        }
        Some(Body { id, pos, vel, mass, radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_is_zero() {
        assert_eq!(BodyId::INVALID.value(), 0);
        assert!(!BodyId::INVALID.is_valid());
    }

    #[test]
    fn try_new_rejects_nonpositive_mass() {
        assert!(Body::try_new(BodyId(1), Vec2::ZERO, Vec2::ZERO, 0.0, 1.0).is_none());
        assert!(Body::try_new(BodyId(1), Vec2::ZERO, Vec2::ZERO, -1.0, 1.0).is_none());
    }

    #[test]
    fn try_new_rejects_nonpositive_radius() {
        assert!(Body::try_new(BodyId(1), Vec2::ZERO, Vec2::ZERO, 1.0, 0.0).is_none());
    }

    #[test]
    fn try_new_accepts_valid_body() {
        let b = Body::try_new(BodyId(7), Vec2::new(1.0, 2.0), Vec2::ZERO, 5.0, 2.0);
        assert!(b.is_some());
    }

    #[test]
    #[should_panic(expected = "invalid body parameters")]
    fn new_panics_on_invalid_mass() {
        Body::new(BodyId(1), Vec2::ZERO, Vec2::ZERO, f64::NAN, 1.0);
    }
}
