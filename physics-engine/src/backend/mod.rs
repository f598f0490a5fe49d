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
//! Force back-end capability set: compute forces, derive velocities, find
//! collision candidates. Three implementations share this interface — scalar,
//! wide-SIMD, and GPU — so a caller can swap one for another without caring
//! which is in use. Dynamic dispatch is fine here: each operation is called
//! once per tick, never in the inner pair loop.

pub mod scalar;
pub mod simd;

#[cfg(feature = "gpu")]
pub mod gpu;

use crate::store::BodyStore;
use crate::vector::Vec2;

/// Newton's gravitational constant, as used throughout this engine.
///
/// This is the legacy CODATA value the original simulator was built against,
/// not the current CODATA 2018 figure (`6.67430e-11`) — kept so that every
/// back-end agrees bit-for-bit-modulo-rounding on the same physical inputs.
pub const G: f64 = 6.6732e-11;

/// An unordered pair of indices `(i, j)` with `i < j` whose bodies overlap.
pub type CollisionPair = (usize, usize);

/// The force/velocity/collision capability set every back-end implements.
pub trait ForceBackend: Send + Sync {
    /// Human-readable name, used in logs and the CLI benchmark driver.
    fn name(&self) -> &str;

    /// Net gravitational force on every body, from every other body.
    ///
    /// `result[i]` is indexed in lock-step with `store`. Self-interaction and
    /// exactly-coincident pairs contribute zero.
    fn forces(&self, store: &BodyStore) -> Vec<Vec2>;

    /// Per-body velocity delta for time-step `dt`, given a forces buffer
    /// produced by [`ForceBackend::forces`] on the same store.
    ///
    /// `result[i] = forces[i] * (dt / mass[i])`. Exposed on the trait (rather
    /// than computed by the caller) so a back-end that keeps the forces
    /// buffer device-side can keep this step there too.
    fn velocities(&self, forces: &[Vec2], store: &BodyStore, dt: f64) -> Vec<Vec2> {
        let mass = store.mass();
        debug_assert_eq!(forces.len(), mass.len());
        forces
            .iter()
            .zip(mass.iter())
            .map(|(f, &m)| *f * (dt / m))
            .collect()
    }

    /// All overlapping pairs `(i, j)`, `i < j`, where `distance(i, j) <
    /// radius_i + radius_j`. Order is back-end-defined but must be
    /// deterministic for a given store (see [`collisions_parallel`]).
    fn collisions(&self, store: &BodyStore) -> Vec<CollisionPair>;
}

/// Gravitational force exerted on body `i` by body `j`, pointing from `i`
/// toward `j`. Shared by every CPU back-end's scalar head/tail handling.
#[inline]
pub(crate) fn pairwise_force(
    xi: f64,
    yi: f64,
    mi: f64,
    xj: f64,
    yj: f64,
    mj: f64,
) -> Vec2 {
    let dx = xj - xi;
    let dy = yj - yi;
    let mut len_sq = dx * dx + dy * dy;
    // Masked guard: a zero-distance pair contributes nothing rather than NaN.
    let notzero = len_sq != 0.0;
    if !notzero {
        len_sq = 1.0;
    }
    let len = len_sq.sqrt();
    let fg = if notzero { G * mi * mj / len_sq } else { 0.0 };
    Vec2::new(dx / len * fg, dy / len * fg)
}

/// Per-thread-private force/collision accumulation shared by every CPU
/// back-end so the parallel reduction order is identical regardless of which
/// back-end produced it (see the crate's concurrency notes on determinism).
///
/// `num_threads` private tables are filled by `fill`, called once per thread
/// index with a mutable reference to that thread's table; the tables are
/// then summed in thread-index order into the returned vector. With
/// `num_threads == 1` this degenerates to the scalar back-end's own loop.
pub(crate) fn reduce_force_tables(n: usize, tables: Vec<Vec<Vec2>>) -> Vec<Vec2> {
    let mut total = vec![Vec2::ZERO; n];
    for table in tables {
        for (acc, contribution) in total.iter_mut().zip(table.iter()) {
            *acc += *contribution;
        }
    }
    total
}

/// Number of logical workers the parallel back-ends fan out across. `1` when
/// the `parallel` feature is disabled, so the round-robin row assignment
/// below degenerates to a single sequential pass.
pub(crate) fn thread_count() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Runs `row_fn` once per thread index in `0..threads`, each filling its own
/// length-`n` force table, then reduces the tables in thread-index order.
///
/// `row_fn(tid, table)` is expected to touch only the rows round-robin
/// assigned to `tid` (`i = tid, tid + threads, tid + 2*threads, ...`) — see
/// [`ForceBackend`] implementors for the convention. Collection preserves
/// input order regardless of which worker finishes first, so the reduction
/// is deterministic.
pub(crate) fn parallel_reduce_forces<F>(n: usize, threads: usize, row_fn: F) -> Vec<Vec2>
where
    F: Fn(usize, &mut [Vec2]) + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let tables: Vec<Vec<Vec2>> = (0..threads)
            .into_par_iter()
            .map(|tid| {
                let mut table = vec![Vec2::ZERO; n];
                row_fn(tid, &mut table);
                table
            })
            .collect();
        reduce_force_tables(n, tables)
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut table = vec![Vec2::ZERO; n];
        row_fn(0, &mut table);
        table
    }
}

/// Runs `find_fn` once per thread index in `0..threads`, each returning its
/// own candidate-pair list, and concatenates the lists in thread-index order.
/// The same determinism argument as [`parallel_reduce_forces`] applies.
pub(crate) fn parallel_reduce_collisions<F>(threads: usize, find_fn: F) -> Vec<CollisionPair>
where
    F: Fn(usize) -> Vec<CollisionPair> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let lists: Vec<Vec<CollisionPair>> = (0..threads).into_par_iter().map(find_fn).collect();
        lists.into_iter().flatten().collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = threads;
        find_fn(0)
    }
}

/// Detects all overlapping pairs in `store` using `thread_count` logical
/// workers, each scanning a disjoint slice of `i` and appending to its own
/// candidate list; lists are concatenated in thread order. Used by every
/// back-end (GPU included, since the original kernel interface never defined
/// a collision-detection kernel) so that ordering is deterministic by
/// construction rather than by accident.
pub(crate) fn collisions_sequential_range(
    store: &BodyStore,
    i_range: std::ops::Range<usize>,
) -> Vec<CollisionPair> {
    let x = store.x();
    let y = store.y();
    let r = store.radius();
    let n = store.len();
    let mut out = Vec::new();
    for i in i_range {
        for j in (i + 1)..n {
            let dx = x[j] - x[i];
            let dy = y[j] - y[i];
            let dist_sq = dx * dx + dy * dy;
            let touch = r[i] + r[j];
            if dist_sq < touch * touch {
                out.push((i, j));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyId};

    fn two_body_store(sep: f64, m1: f64, m2: f64) -> BodyStore {
        let mut store = BodyStore::new();
        store
            .insert(Body::new(BodyId(1), Vec2::new(0.0, 0.0), Vec2::ZERO, m1, 1.0))
            .unwrap();
        store
            .insert(Body::new(BodyId(2), Vec2::new(sep, 0.0), Vec2::ZERO, m2, 1.0))
            .unwrap();
        store
    }

    #[test]
    fn pairwise_force_points_toward_other_body() {
        let f = pairwise_force(0.0, 0.0, 1.0, 10.0, 0.0, 1.0);
        assert!(f.x > 0.0);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn pairwise_force_zero_distance_guard() {
        let f = pairwise_force(1.0, 1.0, 5.0, 1.0, 1.0, 5.0);
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn collisions_sequential_range_finds_overlap() {
        let store = two_body_store(1.5, 1.0, 1.0); // radii sum to 2.0 > 1.5 separation
        let pairs = collisions_sequential_range(&store, 0..store.len());
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn collisions_sequential_range_ignores_far_pairs() {
        let store = two_body_store(10.0, 1.0, 1.0);
        let pairs = collisions_sequential_range(&store, 0..store.len());
        assert!(pairs.is_empty());
    }
}
