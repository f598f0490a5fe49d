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
//! Threading boundary between the simulation and a UI observer.
//!
//! A dedicated worker thread owns the body store exclusively and ticks it on
//! a timer; a four-channel tick packet buffers events under per-channel
//! locks and is copied-then-cleared once per tick before being posted to the
//! UI thread over a [`std::sync::mpsc`] queue. Stopping is cooperative: a
//! quit flag is checked between ticks, never mid-tick, so no partial tick is
//! ever observable. A second channel carries bodies queued by
//! [`SimulationController::add_body`] into the worker, which inserts them
//! before computing that tick's forces so their `created` events precede any
//! `updated` event in the same packet.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::info;

use crate::backend::ForceBackend;
use crate::body::{Body, BodyId};
use crate::error::{EngineError, Result};
use crate::events::{EventBus, Observer};
use crate::integrator::{AdaptiveStepper, StepperConfig};
use crate::scene::Scene;
use crate::store::BodyStore;

/// Construction-time parameters for [`SimulationController`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Interval between ticks on the worker thread.
    pub tick_interval: Duration,
    /// Parameters forwarded to the [`AdaptiveStepper`].
    pub stepper: StepperConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            tick_interval: Duration::from_millis(20),
            stepper: StepperConfig::default(),
        }
    }
}

/// One tick's worth of events, buffered under per-channel locks while the
/// worker thread assembles them.
#[derive(Default)]
struct TickPacket {
    created: Mutex<Vec<(BodyId, Body)>>,
    updated: Mutex<Vec<(BodyId, Body)>>,
    collided: Mutex<Vec<(Body, Body)>>,
    annihilated: Mutex<Vec<Body>>,
}

impl TickPacket {
    /// Copies every channel's contents out and clears it in place, returning
    /// an owned snapshot to hand off to the UI thread.
    fn drain_and_clear(&self) -> TickPacketSnapshot {
        TickPacketSnapshot {
            created: std::mem::take(&mut *self.created.lock().unwrap()),
            updated: std::mem::take(&mut *self.updated.lock().unwrap()),
            collided: std::mem::take(&mut *self.collided.lock().unwrap()),
            annihilated: std::mem::take(&mut *self.annihilated.lock().unwrap()),
        }
    }
}

/// An owned copy of one tick's events, safe to send across threads.
#[derive(Debug, Clone, Default)]
pub struct TickPacketSnapshot {
    /// Bodies created this tick.
    pub created: Vec<(BodyId, Body)>,
    /// Bodies whose state changed this tick.
    pub updated: Vec<(BodyId, Body)>,
    /// Merges resolved this tick: (survivor, absorbed).
    pub collided: Vec<(Body, Body)>,
    /// Bodies removed this tick as the absorbed half of a merge.
    pub annihilated: Vec<Body>,
}

impl TickPacketSnapshot {
    /// Replays this tick's events onto `scene`, in the order the controller
    /// guarantees: created, then updated, then collided/annihilated pairs.
    pub fn replay_to_scene(&self, scene: &mut dyn Scene) {
        for &(id, body) in &self.created {
            scene.add(id, body);
        }
        for &(id, body) in &self.updated {
            scene.set_pos(id, body.pos.x, body.pos.y);
        }
        for &(survivor, absorbed) in &self.collided {
            scene.set_radius(survivor.id, survivor.radius);
            scene.remove(absorbed.id);
        }
    }
}

/// Bridges [`EventBus`] callbacks into a [`TickPacket`]'s locked channels.
struct TickObserver(Arc<TickPacket>);

impl Observer for TickObserver {
    fn created(&mut self, id: BodyId, body: Body) {
        self.0.created.lock().unwrap().push((id, body));
    }
    fn updated(&mut self, id: BodyId, body: Body) {
        self.0.updated.lock().unwrap().push((id, body));
    }
    fn collided(&mut self, survivor: Body, absorbed: Body) {
        self.0.collided.lock().unwrap().push((survivor, absorbed));
    }
    fn annihilated(&mut self, absorbed: Body) {
        self.0.annihilated.lock().unwrap().push(absorbed);
    }
}

/// Owns the body store and a worker thread that ticks it, publishing
/// per-tick event snapshots to whatever drains [`SimulationController::drain_tick_packets`].
pub struct SimulationController {
    quit: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    packet_rx: Mutex<Receiver<TickPacketSnapshot>>,
    add_tx: Sender<Body>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationController {
    /// Spawns the worker thread, which takes ownership of `store` and
    /// `backend` for the remainder of the run — nothing outside the worker
    /// touches the store again. Bodies added later go through
    /// [`SimulationController::add_body`], which hands them to the worker
    /// over a channel rather than reaching back into the store directly.
    pub fn spawn(
        mut store: BodyStore,
        backend: Box<dyn ForceBackend>,
        config: ControllerConfig,
    ) -> Self {
        let quit = Arc::new(AtomicBool::new(false));
        let frame_count = Arc::new(AtomicU64::new(0));
        let (tx, rx) = mpsc::channel();
        let (add_tx, add_rx) = mpsc::channel::<Body>();

        let quit_worker = quit.clone();
        let frame_worker = frame_count.clone();
        let tick_interval = config.tick_interval;

        let handle = thread::spawn(move || {
            info!(backend = backend.name(), "simulation worker started");

            let packet = Arc::new(TickPacket::default());
            let mut bus = EventBus::new();
            bus.register(Box::new(TickObserver(packet.clone())));
            let mut stepper = AdaptiveStepper::new(config.stepper);

            while !quit_worker.load(Ordering::Acquire) {
                thread::sleep(tick_interval);

                // Bodies queued since the last tick join the store before
                // this tick's forces are computed, and their `created`
                // events land in this same packet ahead of any `updated`.
                for body in add_rx.try_iter() {
                    let id = body.id;
                    match store.insert(body) {
                        Ok(_) => bus.emit_created(id, body),
                        Err(err) => tracing::warn!(?id, %err, "dropping body: store insert failed"),
                    }
                }

                stepper.step_by(tick_interval.as_secs_f64(), &mut store, backend.as_ref(), &mut bus);

                let snapshot = packet.drain_and_clear();
                if tx.send(snapshot).is_err() {
                    break; // UI side gone; finish this tick, then stop.
                }
                frame_worker.fetch_add(1, Ordering::Relaxed);
            }
        });

        SimulationController {
            quit,
            frame_count,
            packet_rx: Mutex::new(rx),
            add_tx,
            handle: Some(handle),
        }
    }

    /// Queues `body` to join the simulation on the worker's next tick.
    ///
    /// Returns [`EngineError::BackendUnavailable`] if the worker has already
    /// stopped; the caller owns `body`'s identifier (callers are expected to
    /// pick one that doesn't collide with a body already in the store).
    pub fn add_body(&self, body: Body) -> Result<()> {
        self.add_tx.send(body).map_err(|_| EngineError::BackendUnavailable {
            reason: "simulation worker has stopped".to_string(),
        })
    }

    /// Requests the worker stop after its current tick, and joins it.
    /// Idempotent: calling `stop` twice is a no-op the second time.
    pub fn stop(&mut self) {
        self.quit.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Drains every tick packet published so far without blocking.
    pub fn drain_tick_packets(&self) -> Vec<TickPacketSnapshot> {
        self.packet_rx.lock().unwrap().try_iter().collect()
    }

    /// Reads the number of ticks completed since the last call and resets
    /// the counter to zero — meant to be polled once a second by a UI-side
    /// timer to compute an observable frames-per-second value.
    pub fn sample_and_reset_fps(&self) -> u64 {
        self.frame_count.swap(0, Ordering::Relaxed)
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        self.stop();
    }
}
