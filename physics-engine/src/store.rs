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
//! Structure-of-arrays body storage.
//!
//! Six parallel numeric columns plus an identifier column, kept equal length
//! at all times. An index into the store is only valid for as long as no
//! `insert`/`erase` has happened since it was obtained; the [`BodyId`] is the
//! only handle that survives across ticks. Callers that hold on to an index
//! across a mutation are a bug the store cannot detect on release builds —
//! `debug_assert!` catches the common case (an out-of-range index) in tests
//! and debug binaries without paying for the check in release.

use std::collections::HashMap;

use crate::body::{Body, BodyId};
use crate::error::{EngineError, Result};
use crate::vector::Vec2;

/// Column-oriented container of bodies.
///
/// See the module docs for the index/identifier distinction.
#[derive(Debug, Default)]
pub struct BodyStore {
    x: Vec<f64>,
    y: Vec<f64>,
    vx: Vec<f64>,
    vy: Vec<f64>,
    mass: Vec<f64>,
    radius: Vec<f64>,
    ids: Vec<BodyId>,
    index_of: HashMap<BodyId, usize>,
}

impl BodyStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies currently held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the store holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Append `body` to every column. Returns the new index.
    ///
    /// Fails only if the backing allocation cannot grow; never fails because
    /// of body content (mass/radius positivity is enforced by [`Body`]'s
    /// constructors before a caller can reach this point).
    pub fn insert(&mut self, body: Body) -> Result<usize> {
        debug_assert!(
            !self.index_of.contains_key(&body.id),
            "duplicate body id inserted: {:?}",
            body.id
        );

        self.x.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.y.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.vx.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.vy.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.mass.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.radius.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;
        self.ids.try_reserve(1).map_err(|_| EngineError::OutOfMemory)?;

        let idx = self.ids.len();
        self.x.push(body.pos.x);
        self.y.push(body.pos.y);
        self.vx.push(body.vel.x);
        self.vy.push(body.vel.y);
        self.mass.push(body.mass);
        self.radius.push(body.radius);
        self.ids.push(body.id);
        self.index_of.insert(body.id, idx);

        debug_assert_eq!(self.x.len(), self.ids.len());
        Ok(idx)
    }

    /// Remove the body at `idx` by overwriting it with the last element and
    /// shrinking the store by one (swap-pop). O(1).
    ///
    /// Invalidates whatever index used to name the last element — it now
    /// names `idx`. Does not invalidate any [`BodyId`].
    pub fn erase(&mut self, idx: usize) {
        let len = self.ids.len();
        debug_assert!(idx < len, "erase index {idx} out of bounds ({len})");

        let last = len - 1;
        self.x.swap(idx, last);
        self.y.swap(idx, last);
        self.vx.swap(idx, last);
        self.vy.swap(idx, last);
        self.mass.swap(idx, last);
        self.radius.swap(idx, last);
        self.ids.swap(idx, last);

        let removed_id = self.ids.pop().expect("store non-empty by precondition");
        self.x.pop();
        self.y.pop();
        self.vx.pop();
        self.vy.pop();
        self.mass.pop();
        self.radius.pop();

        self.index_of.remove(&removed_id);
        if idx != last {
            let moved_id = self.ids[idx];
            self.index_of.insert(moved_id, idx);
        }

        debug_assert_eq!(self.x.len(), self.ids.len());
    }

    /// Materialize the body at `idx`.
    pub fn get(&self, idx: usize) -> Body {
        Body {
            id: self.ids[idx],
            pos: Vec2::new(self.x[idx], self.y[idx]),
            vel: Vec2::new(self.vx[idx], self.vy[idx]),
            mass: self.mass[idx],
            radius: self.radius[idx],
        }
    }

    /// Translate a stable identifier to its current index, if present.
    pub fn id_to_index(&self, id: BodyId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// The stable identifier currently occupying `idx`.
    pub fn index_to_id(&self, idx: usize) -> BodyId {
        self.ids[idx]
    }

    /// Overwrite the position at `idx`.
    pub fn set_pos(&mut self, idx: usize, pos: Vec2) {
        self.x[idx] = pos.x;
        self.y[idx] = pos.y;
    }

    /// Overwrite the velocity at `idx`.
    pub fn set_velocity(&mut self, idx: usize, vel: Vec2) {
        self.vx[idx] = vel.x;
        self.vy[idx] = vel.y;
    }

    /// Overwrite the mass at `idx`. Must remain strictly positive.
    pub fn set_mass(&mut self, idx: usize, mass: f64) {
        debug_assert!(mass.is_finite() && mass > 0.0, "mass must be positive, got {mass}");
        self.mass[idx] = mass;
    }

    /// Overwrite the radius at `idx`. Must remain strictly positive.
    pub fn set_radius(&mut self, idx: usize, radius: f64) {
        debug_assert!(radius.is_finite() && radius > 0.0, "radius must be positive, got {radius}");
        self.radius[idx] = radius;
    }

    /// Borrowed view of the x column, for back-ends.
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    /// Borrowed view of the y column, for back-ends.
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    /// Borrowed view of the vx column, for back-ends.
    pub fn vx(&self) -> &[f64] {
        &self.vx
    }
    /// Borrowed view of the vy column, for back-ends.
    pub fn vy(&self) -> &[f64] {
        &self.vy
    }
    /// Borrowed view of the mass column, for back-ends.
    pub fn mass(&self) -> &[f64] {
        &self.mass
    }
    /// Borrowed view of the radius column, for back-ends.
    pub fn radius(&self) -> &[f64] {
        &self.radius
    }
    /// Borrowed view of the identifier column.
    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    /// Check that every invariant in the module docs holds. Used by tests and
    /// debug assertions; not called on the hot path.
    pub fn check_invariants(&self) {
        let n = self.ids.len();
        debug_assert_eq!(self.x.len(), n);
        debug_assert_eq!(self.y.len(), n);
        debug_assert_eq!(self.vx.len(), n);
        debug_assert_eq!(self.vy.len(), n);
        debug_assert_eq!(self.mass.len(), n);
        debug_assert_eq!(self.radius.len(), n);
        debug_assert_eq!(self.index_of.len(), n);
        for i in 0..n {
            debug_assert!(self.mass[i] > 0.0);
            debug_assert!(self.radius[i] > 0.0);
            debug_assert_eq!(self.index_of.get(&self.ids[i]), Some(&i));
        }
    }
}
