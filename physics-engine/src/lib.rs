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
//! # Gravity Engine
//!
//! A deterministic 2D N-body Newtonian gravity simulation engine with
//! pluggable scalar, wide-SIMD, and GPU force back-ends.
//!
//! ## Architecture
//!
//! - [`vector`] — 2D vector primitives shared by every back-end.
//! - [`body`] / [`store`] — a body's value type and the structure-of-arrays
//!   container every back-end reads from.
//! - [`backend`] — the `ForceBackend` capability set (forces, velocities,
//!   collision candidates) and its scalar/SIMD/GPU implementations.
//! - [`simd`] — wide-register gravity kernels with runtime CPU dispatch.
//! - [`integrator`] — the adaptive-Δt stepper.
//! - [`collision`] — deterministic collision merging.
//! - [`events`] — per-tick observer fan-out.
//! - [`controller`] — the threaded simulation/UI boundary.
//! - [`scene`] — the external rendering interface the controller drives.
//!
//! ## Example
//!
//! ```rust
//! use gravity_engine::backend::scalar::ScalarBackend;
//! use gravity_engine::backend::ForceBackend;
//! use gravity_engine::body::{Body, BodyId};
//! use gravity_engine::store::BodyStore;
//! use gravity_engine::vector::Vec2;
//!
//! let mut store = BodyStore::new();
//! store.insert(Body::new(BodyId(1), Vec2::ZERO, Vec2::ZERO, 5.97e24, 6.37e6)).unwrap();
//! store.insert(Body::new(BodyId(2), Vec2::new(3.84e8, 0.0), Vec2::ZERO, 7.35e22, 1.74e6)).unwrap();
//!
//! let forces = ScalarBackend.forces(&store);
//! assert_eq!(forces.len(), 2);
//! ```

#![warn(missing_docs)]

/// Two-dimensional vector primitives.
pub mod vector;

/// Body value type and stable identifier.
pub mod body;

/// Crate-wide error type.
pub mod error;

/// Structure-of-arrays body storage.
pub mod store;

/// Force back-end capability set and implementations.
pub mod backend;

/// Wide-register gravity kernels with runtime CPU dispatch.
pub mod simd;

/// Adaptive time-step integrator.
pub mod integrator;

/// Collision detection and merge resolution.
pub mod collision;

/// Per-tick event fan-out.
pub mod events;

/// Threaded simulation controller.
pub mod controller;

/// External rendering scene interface.
pub mod scene;

pub use body::{Body, BodyId};
pub use error::{EngineError, Result};
pub use store::BodyStore;
pub use vector::Vec2;
