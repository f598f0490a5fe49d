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
//! AVX2 gravity kernel: 4 `f64` lanes per instruction (256-bit vectors).

use super::GravityKernel;
use crate::backend::G;
use crate::vector::Vec2;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// AVX2 kernel for x86_64 CPUs. Broadcasts the source body and loads four
/// target bodies per call.
pub struct Avx2Kernel;

impl GravityKernel for Avx2Kernel {
    fn name(&self) -> &str {
        "AVX2"
    }

    fn width(&self) -> usize {
        4
    }

    fn is_supported(&self) -> bool {
        #[cfg(target_arch = "x86_64")]
        {
            is_x86_feature_detected!("avx2")
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            false
        }
    }

    #[cfg(target_arch = "x86_64")]
    unsafe fn force_block(
        &self,
        xi: f64,
        yi: f64,
        mi: f64,
        xj: &[f64],
        yj: &[f64],
        mj: &[f64],
        out_i: &mut Vec2,
        out_j: &mut [Vec2],
    ) {
        force_block_avx2(xi, yi, mi, xj, yj, mj, out_i, out_j)
    }

    #[cfg(not(target_arch = "x86_64"))]
    unsafe fn force_block(
        &self,
        _xi: f64,
        _yi: f64,
        _mi: f64,
        _xj: &[f64],
        _yj: &[f64],
        _mj: &[f64],
        _out_i: &mut Vec2,
        _out_j: &mut [Vec2],
    ) {
        panic!("AVX2 kernel is not available on non-x86_64 platforms; check is_supported() first");
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[target_feature(enable = "avx")]
unsafe fn force_block_avx2(
    xi: f64,
    yi: f64,
    mi: f64,
    xj: &[f64],
    yj: &[f64],
    mj: &[f64],
    out_i: &mut Vec2,
    out_j: &mut [Vec2],
) {
    debug_assert_eq!(xj.len(), 4);
    debug_assert_eq!(yj.len(), 4);
    debug_assert_eq!(mj.len(), 4);
    debug_assert_eq!(out_j.len(), 4);

    let x0 = _mm256_set1_pd(xi);
    let y0 = _mm256_set1_pd(yi);
    let m0 = _mm256_set1_pd(mi);

    let x1234 = _mm256_loadu_pd(xj.as_ptr());
    let y1234 = _mm256_loadu_pd(yj.as_ptr());
    let m1234 = _mm256_loadu_pd(mj.as_ptr());

    let dx = _mm256_sub_pd(x1234, x0);
    let dy = _mm256_sub_pd(y1234, y0);
    let dx2 = _mm256_mul_pd(dx, dx);
    let dy2 = _mm256_mul_pd(dy, dy);
    let dist_sq_raw = _mm256_add_pd(dx2, dy2);

    // Coincident bodies land here with dist_sq_raw == 0; dividing by that
    // directly would produce NaN/inf (see pairwise_force's `notzero` guard).
    // Substitute 1.0 in those lanes before dividing, then zero the resulting
    // force in the same lanes so a same-position pair contributes nothing.
    let zero = _mm256_setzero_pd();
    let one = _mm256_set1_pd(1.0);
    let is_zero = _mm256_cmp_pd(dist_sq_raw, zero, _CMP_EQ_OQ);
    let dist_sq = _mm256_blendv_pd(dist_sq_raw, one, is_zero);
    let dist = _mm256_sqrt_pd(dist_sq);

    let masses = _mm256_mul_pd(m0, m1234);
    let g = _mm256_set1_pd(G);
    let g_masses = _mm256_mul_pd(g, masses);
    let fg_raw = _mm256_div_pd(g_masses, dist_sq);
    let fg = _mm256_blendv_pd(fg_raw, zero, is_zero);

    let ux = _mm256_div_pd(dx, dist);
    let uy = _mm256_div_pd(dy, dist);

    let fx = _mm256_mul_pd(ux, fg);
    let fy = _mm256_mul_pd(uy, fg);

    let mut fx_lanes = [0.0f64; 4];
    let mut fy_lanes = [0.0f64; 4];
    _mm256_storeu_pd(fx_lanes.as_mut_ptr(), fx);
    _mm256_storeu_pd(fy_lanes.as_mut_ptr(), fy);

    for k in 0..4 {
        *out_i += Vec2::new(fx_lanes[k], fy_lanes[k]);
        out_j[k] = Vec2::new(-fx_lanes[k], -fy_lanes[k]);
    }
}
