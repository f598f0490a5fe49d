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
//! Adaptive time-step integrator.
//!
//! Holds one persistent Δt shared by every body in the store — the original
//! engine's single global step size, not per-body sub-cycling. Each call to
//! [`AdaptiveStepper::step`] rescales that Δt until the largest per-body
//! displacement falls inside a target window, commits the result, then runs
//! collision resolution on the post-step geometry.

use tracing::debug;

use crate::backend::ForceBackend;
use crate::collision::resolve_collisions;
use crate::events::EventBus;
use crate::store::BodyStore;
use crate::vector::Vec2;

/// Lower bound of the accepted per-tick displacement window, in meters.
pub const MIN_DISPLACEMENT_M: f64 = 1.0e3;
/// Upper bound of the accepted per-tick displacement window, in meters.
pub const MAX_DISPLACEMENT_M: f64 = 100.0e3;
/// Initial Δt, in seconds, before any adaptation has occurred.
pub const INITIAL_DT_S: f64 = 60.0;

/// Construction-time parameters for [`AdaptiveStepper`].
#[derive(Debug, Clone, Copy)]
pub struct StepperConfig {
    /// Δt used before the first call to `step`.
    pub initial_dt: f64,
    /// Displacements below this are too small: grow Δt and retry.
    pub min_displacement_m: f64,
    /// Displacements above this are too large: shrink Δt and retry.
    pub max_displacement_m: f64,
}

impl Default for StepperConfig {
    fn default() -> Self {
        StepperConfig {
            initial_dt: INITIAL_DT_S,
            min_displacement_m: MIN_DISPLACEMENT_M,
            max_displacement_m: MAX_DISPLACEMENT_M,
        }
    }
}

/// Drives the store forward in time, adapting Δt to keep the largest
/// per-body displacement inside a calibrated window.
pub struct AdaptiveStepper {
    config: StepperConfig,
    dt: f64,
}

impl AdaptiveStepper {
    /// Builds a stepper whose Δt starts at `config.initial_dt`.
    pub fn new(config: StepperConfig) -> Self {
        let dt = config.initial_dt;
        AdaptiveStepper { config, dt }
    }

    /// The Δt that would be used by the next call to `step`.
    pub fn current_dt(&self) -> f64 {
        self.dt
    }

    /// Advances the simulation by one adaptively-sized tick: computes
    /// forces, rescales Δt until the trial displacement is in-window,
    /// commits positions and velocities, then resolves collisions.
    ///
    /// Returns the Δt actually used. An empty store has no body whose
    /// displacement could ever grow, so this short-circuits rather than
    /// spinning trying to push Δt toward a travel distance that stays zero.
    pub fn step(&mut self, store: &mut BodyStore, backend: &dyn ForceBackend, bus: &mut EventBus) -> f64 {
        let n = store.len();
        if n == 0 {
            return self.dt;
        }

        let forces = backend.forces(store);

        let (trial_pos, trial_vel) = loop {
            let dv = backend.velocities(&forces, store, self.dt);
            let mut trial_pos = Vec::with_capacity(n);
            let mut trial_vel = Vec::with_capacity(n);
            let mut max_travel = 0.0f64;

            for i in 0..n {
                let body = store.get(i);
                let v_new = body.vel + dv[i];
                let p_new = body.pos + v_new * self.dt;
                let travel = (p_new - body.pos).length();
                if travel > max_travel {
                    max_travel = travel;
                }
                trial_pos.push(p_new);
                trial_vel.push(v_new);
            }

            if max_travel > self.config.max_displacement_m {
                self.dt *= self.config.max_displacement_m / max_travel;
                debug!(dt = self.dt, max_travel, "shrinking dt: trial displacement too large");
                continue;
            }
            if max_travel < self.config.min_displacement_m && max_travel > 0.0 {
                self.dt *= self.config.min_displacement_m / max_travel;
                debug!(dt = self.dt, max_travel, "growing dt: trial displacement too small");
                continue;
            }
            break (trial_pos, trial_vel);
        };

        for i in 0..n {
            store.set_pos(i, trial_pos[i]);
            store.set_velocity(i, trial_vel[i]);
        }

        let pairs = backend.collisions(store);
        if !pairs.is_empty() {
            resolve_collisions(store, &pairs, bus);
        }

        self.dt
    }

    /// Repeatedly calls `step` until `target_dt` has been consumed, then
    /// emits a single `updated` event per surviving body — not one per
    /// sub-step.
    pub fn step_by(
        &mut self,
        mut target_dt: f64,
        store: &mut BodyStore,
        backend: &dyn ForceBackend,
        bus: &mut EventBus,
    ) {
        let span = tracing::info_span!("tick", n_bodies = store.len(), target_dt);
        let _guard = span.enter();

        while target_dt > 0.0 {
            let used = self.step(store, backend, bus);
            target_dt -= used;
        }

        for idx in 0..store.len() {
            let id = store.index_to_id(idx);
            bus.emit_updated(id, store.get(idx));
        }
    }
}
