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
//! Wide-SIMD, optionally multi-threaded force back-end.
//!
//! Each row `i` is processed as scalar-head/SIMD-body/scalar-tail: the
//! trailing bodies `j` in `(i+1)..n` are consumed `width()` at a time by the
//! selected [`GravityKernel`], with whatever doesn't divide evenly handled
//! one pair at a time through the same scalar [`pairwise_force`] every other
//! back-end uses. Rows are assigned to worker threads round-robin
//! (`i = tid, tid + threads, tid + 2*threads, ...`) to balance the
//! triangular O(n^2) workload, and the per-thread force tables are reduced in
//! thread-index order so the result is identical regardless of scheduling.

use super::{
    pairwise_force, parallel_reduce_collisions, parallel_reduce_forces, thread_count,
    CollisionPair, ForceBackend,
};
use crate::simd::{select_kernel, GravityKernel};
use crate::store::BodyStore;
use crate::vector::Vec2;

/// Force back-end dispatching to the best available wide-SIMD kernel.
pub struct SimdBackend;

impl ForceBackend for SimdBackend {
    fn name(&self) -> &str {
        "simd"
    }

    fn forces(&self, store: &BodyStore) -> Vec<Vec2> {
        let n = store.len();
        if n == 0 {
            return Vec::new();
        }
        let x = store.x();
        let y = store.y();
        let mass = store.mass();
        let threads = thread_count();
        let kernel = select_kernel();

        parallel_reduce_forces(n, threads, |tid, table| {
            let mut row = tid;
            while row < n {
                accumulate_row(kernel.as_ref(), row, x, y, mass, table);
                row += threads;
            }
        })
    }

    fn collisions(&self, store: &BodyStore) -> Vec<CollisionPair> {
        let threads = thread_count();
        parallel_reduce_collisions(threads, |tid| collisions_round_robin(store, tid, threads))
    }
}

/// Accumulates every force on row `i` from bodies `(i+1)..n` into `table`,
/// and the reciprocal (negated) force onto each of those bodies, using
/// `kernel` for as many full-width blocks as fit and a scalar tail for the
/// remainder.
fn accumulate_row(
    kernel: &dyn GravityKernel,
    i: usize,
    x: &[f64],
    y: &[f64],
    mass: &[f64],
    table: &mut [Vec2],
) {
    let n = x.len();
    let width = kernel.width();
    let (xi, yi, mi) = (x[i], y[i], mass[i]);

    let mut j = i + 1;
    let mut row_force = Vec2::ZERO;

    while j + width <= n {
        let mut out_j = vec![Vec2::ZERO; width];
        // SAFETY: slices are exactly `width` long, and `kernel` was produced
        // by `select_kernel`, which only returns kernels the CPU supports.
        unsafe {
            kernel.force_block(
                xi,
                yi,
                mi,
                &x[j..j + width],
                &y[j..j + width],
                &mass[j..j + width],
                &mut row_force,
                &mut out_j,
            );
        }
        for (k, f) in out_j.into_iter().enumerate() {
            table[j + k] += f;
        }
        j += width;
    }

    while j < n {
        let f = pairwise_force(xi, yi, mi, x[j], y[j], mass[j]);
        row_force += f;
        table[j] += -f;
        j += 1;
    }

    table[i] += row_force;
}

/// Collision candidates among rows `i = tid, tid + threads, ...`, mirroring
/// the round-robin row assignment [`accumulate_row`] uses for forces so both
/// operations balance the same triangular workload the same way.
fn collisions_round_robin(store: &BodyStore, tid: usize, threads: usize) -> Vec<CollisionPair> {
    let x = store.x();
    let y = store.y();
    let r = store.radius();
    let n = store.len();
    let mut out = Vec::new();

    let mut i = tid;
    while i < n {
        for j in (i + 1)..n {
            let dx = x[j] - x[i];
            let dy = y[j] - y[i];
            let dist_sq = dx * dx + dy * dy;
            let touch = r[i] + r[j];
            if dist_sq < touch * touch {
                out.push((i, j));
            }
        }
        i += threads;
    }
    out
}
