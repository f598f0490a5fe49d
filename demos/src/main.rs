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
//! Benchmark driver: `bench-backends <problem-size>`.
//!
//! Builds a synthetic N-body problem of the requested size, times
//! `forces()` on every CPU-reachable back-end, and reports the elapsed
//! nanoseconds per back-end. If two back-ends' force vectors diverge beyond
//! four units-in-the-last-place, prints an assertion line naming the pair
//! and body index.

use std::time::Instant;

use gravity_engine::backend::scalar::ScalarBackend;
use gravity_engine::backend::simd::SimdBackend;
use gravity_engine::backend::ForceBackend;
use gravity_engine::body::{Body, BodyId};
use gravity_engine::store::BodyStore;
use gravity_engine::vector::Vec2;

fn usage_error(prog: &str) -> ! {
    eprintln!("usage: {prog} <problem-size>");
    std::process::exit(1);
}

fn build_problem(n: usize) -> BodyStore {
    let mut store = BodyStore::new();
    for i in 0..n {
        let angle = i as f64 * 0.618_034; // golden-angle spiral, avoids coincident bodies
        let radius = 1.0e7 * (i as f64 + 1.0).sqrt();
        let pos = Vec2::new(radius * angle.cos(), radius * angle.sin());
        let mass = 1.0e20 * (1.0 + (i % 7) as f64);
        store
            .insert(Body::new(BodyId::new(i as u64 + 1), pos, Vec2::ZERO, mass, 1.0e5))
            .expect("problem generator never exceeds available memory");
    }
    store
}

/// Distance, in representable `f64` steps, between two values of the same sign.
fn ulps_apart(a: f64, b: f64) -> u64 {
    if a == b {
        return 0;
    }
    let ai = a.to_bits() as i64;
    let bi = b.to_bits() as i64;
    ai.abs_diff(bi)
}

fn report_divergence(name_a: &str, forces_a: &[Vec2], name_b: &str, forces_b: &[Vec2]) {
    const ULP_TOLERANCE: u64 = 4;
    for (i, (fa, fb)) in forces_a.iter().zip(forces_b.iter()).enumerate() {
        let dx = ulps_apart(fa.x, fb.x);
        let dy = ulps_apart(fa.y, fb.y);
        if dx > ULP_TOLERANCE || dy > ULP_TOLERANCE {
            println!(
                "ASSERTION: {name_a} and {name_b} diverge at body {i} by ({dx}, {dy}) ulps"
            );
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args();
    let prog = args.next().unwrap_or_else(|| "bench-backends".to_string());

    let size_arg = match args.next() {
        Some(arg) => arg,
        None => usage_error(&prog),
    };
    let n: usize = match size_arg.parse() {
        Ok(n) if n > 0 => n,
        _ => usage_error(&prog),
    };

    let store = build_problem(n);

    let scalar = ScalarBackend;
    let start = Instant::now();
    let scalar_forces = scalar.forces(&store);
    println!("Elapsed time: {} ns", start.elapsed().as_nanos());

    let simd = SimdBackend;
    let start = Instant::now();
    let simd_forces = simd.forces(&store);
    println!("Elapsed time: {} ns", start.elapsed().as_nanos());

    report_divergence("scalar", &scalar_forces, "simd", &simd_forces);

    #[cfg(feature = "gpu")]
    {
        match gravity_engine::backend::gpu::GpuBackend::try_new() {
            Ok(gpu) => {
                let start = Instant::now();
                let gpu_forces = gpu.forces(&store);
                println!("Elapsed time: {} ns", start.elapsed().as_nanos());
                report_divergence("scalar", &scalar_forces, "gpu", &gpu_forces);
            }
            Err(e) => {
                eprintln!("gpu backend unavailable: {e}");
            }
        }
    }
}
