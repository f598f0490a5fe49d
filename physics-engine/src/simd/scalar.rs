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
//! Scalar fallback gravity kernel: always available, used when no wider
//! instruction set is supported and as the tail handler for body counts not
//! divisible by a wide kernel's lane width.

use super::GravityKernel;
use crate::backend::pairwise_force;
use crate::vector::Vec2;

/// One-lane-at-a-time gravity kernel.
pub struct ScalarKernel;

impl GravityKernel for ScalarKernel {
    fn name(&self) -> &str {
        "Scalar"
    }

    fn width(&self) -> usize {
        1
    }

    fn is_supported(&self) -> bool {
        true
    }

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
        let f = pairwise_force(xi, yi, mi, xj[0], yj[0], mj[0]);
        *out_i += f;
        out_j[0] = -f;
    }
}
