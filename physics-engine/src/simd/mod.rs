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
//! Wide-register gravity kernels with automatic runtime dispatch.
//!
//! This module provides the lane-width-specific inner loop of the wide-SIMD
//! force back-end: given one "source" body `i` and an aligned block of `width()`
//! "target" bodies `j..j+width()`, compute the `width()` pairwise forces in
//! lanes. The back-end in [`crate::backend::simd`] owns the scalar head/tail
//! partitioning and the per-thread reduction; this module only owns the
//! vectorized middle.
//!
//! # Architecture
//!
//! - **Runtime Detection**: CPU features are detected once and cached for the process.
//! - **Dispatch**: selects the best available kernel (AVX-512 > AVX2 > scalar).
//! - **Deterministic**: every kernel computes the same formula in the same order
//!   of operations, so results agree within floating-point rounding.
//! - **Stable Rust**: uses `std::arch` intrinsics, no nightly features required.
//!
//! # Safety
//!
//! Kernel methods are `unsafe` and gated by `#[target_feature]`; callers must
//! check [`GravityKernel::is_supported`] (or go through [`select_kernel`],
//! which only returns supported kernels) before invoking them.

mod dispatch;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(target_arch = "x86_64")]
mod avx512;

pub use dispatch::{detect_cpu_features, CpuFeatures};
pub use scalar::ScalarKernel;

#[cfg(target_arch = "x86_64")]
pub use avx2::Avx2Kernel;

#[cfg(target_arch = "x86_64")]
pub use avx512::Avx512Kernel;

use std::sync::OnceLock;

/// A vectorized gravity-force kernel processing `width()` bodies per call.
pub trait GravityKernel: Send + Sync {
    /// Kernel name, for logs and the CLI benchmark driver.
    fn name(&self) -> &str;

    /// Number of `f64` lanes processed per call to [`GravityKernel::force_block`].
    fn width(&self) -> usize;

    /// Whether the current CPU supports this kernel's instruction set.
    fn is_supported(&self) -> bool;

    /// Compute `width()` pairwise forces of source body `(xi, yi, mi)` against
    /// target bodies `xj[k], yj[k], mj[k]`, writing the force on the source
    /// (summed across lanes) into `out_i`, and the (negated, per-lane) force
    /// on each target into `out_j`.
    ///
    /// # Safety
    /// `xj`, `yj`, `mj`, `out_j` must all have length exactly `width()`, and
    /// the CPU must support this kernel's required instruction set.
    unsafe fn force_block(
        &self,
        xi: f64,
        yi: f64,
        mi: f64,
        xj: &[f64],
        yj: &[f64],
        mj: &[f64],
        out_i: &mut crate::vector::Vec2,
        out_j: &mut [crate::vector::Vec2],
    );
}

static SELECTED_KERNEL: OnceLock<&'static str> = OnceLock::new();

/// Selects the best available gravity kernel for the current CPU, in
/// priority order AVX-512 > AVX2 > scalar. Selection is cached for the
/// process lifetime.
pub fn select_kernel() -> Box<dyn GravityKernel> {
    let name = SELECTED_KERNEL.get_or_init(|| {
        let features = detect_cpu_features();

        #[cfg(target_arch = "x86_64")]
        {
            if features.has_avx512f && features.has_avx512dq {
                return "AVX-512";
            }
            if features.has_avx2 {
                return "AVX2";
            }
        }
        "Scalar"
    });

    match *name {
        #[cfg(target_arch = "x86_64")]
        "AVX-512" => Box::new(Avx512Kernel),
        #[cfg(target_arch = "x86_64")]
        "AVX2" => Box::new(Avx2Kernel),
        _ => Box::new(ScalarKernel),
    }
}
