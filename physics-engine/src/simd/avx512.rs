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
//! AVX-512 gravity kernel: 8 `f64` lanes per instruction (512-bit vectors).

use super::GravityKernel;
use crate::backend::G;
use crate::vector::Vec2;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// AVX-512 kernel for x86_64 CPUs with AVX-512F + AVX-512DQ.
pub struct Avx512Kernel;

impl GravityKernel for Avx512Kernel {
    fn name(&self) -> &str {
        "AVX-512"
    }

    fn width(&self) -> usize {
        8
    }

    fn is_supported(&self) -> bool {
        #[cfg(target_arch = "x86_64")]
        {
            is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512dq")
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
        force_block_avx512(xi, yi, mi, xj, yj, mj, out_i, out_j)
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
        panic!("AVX-512 kernel is not available on non-x86_64 platforms; check is_supported() first");
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512f")]
#[target_feature(enable = "avx512dq")]
unsafe fn force_block_avx512(
    xi: f64,
    yi: f64,
    mi: f64,
    xj: &[f64],
    yj: &[f64],
    mj: &[f64],
    out_i: &mut Vec2,
    out_j: &mut [Vec2],
) {
    debug_assert_eq!(xj.len(), 8);
    debug_assert_eq!(yj.len(), 8);
    debug_assert_eq!(mj.len(), 8);
    debug_assert_eq!(out_j.len(), 8);

    let x0 = _mm512_set1_pd(xi);
    let y0 = _mm512_set1_pd(yi);
    let m0 = _mm512_set1_pd(mi);

    let x1_8 = _mm512_loadu_pd(xj.as_ptr());
    let y1_8 = _mm512_loadu_pd(yj.as_ptr());
    let m1_8 = _mm512_loadu_pd(mj.as_ptr());

    let dx = _mm512_sub_pd(x1_8, x0);
    let dy = _mm512_sub_pd(y1_8, y0);
    let dist_sq_raw = _mm512_add_pd(_mm512_mul_pd(dx, dx), _mm512_mul_pd(dy, dy));

    // Same zero-distance guard as pairwise_force, expressed with a mask
    // register instead of a blend: a coincident pair's lane gets a safe 1.0
    // divisor and its force contribution is masked back to zero afterward.
    let zero = _mm512_setzero_pd();
    let one = _mm512_set1_pd(1.0);
    let is_zero = _mm512_cmp_pd_mask(dist_sq_raw, zero, _CMP_EQ_OQ);
    let dist_sq = _mm512_mask_blend_pd(is_zero, dist_sq_raw, one);
    let dist = _mm512_sqrt_pd(dist_sq);

    let masses = _mm512_mul_pd(m0, m1_8);
    let g = _mm512_set1_pd(G);
    let fg_raw = _mm512_div_pd(_mm512_mul_pd(g, masses), dist_sq);
    let fg = _mm512_mask_blend_pd(is_zero, fg_raw, zero);

    let ux = _mm512_div_pd(dx, dist);
    let uy = _mm512_div_pd(dy, dist);

    let fx = _mm512_mul_pd(ux, fg);
    let fy = _mm512_mul_pd(uy, fg);

    let mut fx_lanes = [0.0f64; 8];
    let mut fy_lanes = [0.0f64; 8];
    _mm512_storeu_pd(fx_lanes.as_mut_ptr(), fx);
    _mm512_storeu_pd(fy_lanes.as_mut_ptr(), fy);

    for k in 0..8 {
        *out_i += Vec2::new(fx_lanes[k], fy_lanes[k]);
        out_j[k] = Vec2::new(-fx_lanes[k], -fy_lanes[k]);
    }
}
