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
//! Per-tick event fan-out.
//!
//! Observers register once for the run and receive four kinds of events:
//! `created`, `updated`, `collided`, `annihilated`. Within one tick, `created`
//! precedes `updated`, and each `collided` precedes its matching
//! `annihilated` — the stepper and resolver are responsible for calling
//! through the bus in that order; the bus itself just fans out.

use crate::body::{Body, BodyId};

/// Receives simulation events. Implementors hold no reference back to the
/// [`EventBus`] that calls them — only a lookup from bus to observer, never
/// the reverse, so there's no ownership cycle to break.
pub trait Observer: Send {
    /// A new body was inserted.
    fn created(&mut self, id: BodyId, body: Body);

    /// A body's state changed, emitted once per body at the end of `step_by`.
    fn updated(&mut self, id: BodyId, body: Body);

    /// Two bodies merged; `survivor` already reflects the merged state.
    fn collided(&mut self, survivor: Body, absorbed: Body);

    /// A body was removed as the absorbed half of a merge. Always follows
    /// the `collided` call naming the same body.
    fn annihilated(&mut self, absorbed: Body);
}

/// Fans out simulation events to every registered observer, in registration
/// order.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn Observer>>,
}

impl EventBus {
    /// An event bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for the remaining lifetime of the bus.
    pub fn register(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub(crate) fn emit_created(&mut self, id: BodyId, body: Body) {
        for observer in &mut self.observers {
            observer.created(id, body);
        }
    }

    pub(crate) fn emit_updated(&mut self, id: BodyId, body: Body) {
        for observer in &mut self.observers {
            observer.updated(id, body);
        }
    }

    pub(crate) fn emit_collided(&mut self, survivor: Body, absorbed: Body) {
        for observer in &mut self.observers {
            observer.collided(survivor, absorbed);
        }
    }

    pub(crate) fn emit_annihilated(&mut self, absorbed: Body) {
        for observer in &mut self.observers {
            observer.annihilated(absorbed);
        }
    }
}
