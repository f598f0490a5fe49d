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
//! CPU feature detection and runtime dispatch.

use std::sync::OnceLock;

/// CPU feature flags detected at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFeatures {
    /// CPU supports SSE2 (baseline on x86_64).
    pub has_sse2: bool,
    /// CPU supports AVX.
    pub has_avx: bool,
    /// CPU supports AVX2.
    pub has_avx2: bool,
    /// CPU supports FMA (fused multiply-add).
    pub has_fma: bool,
    /// CPU supports AVX-512 Foundation.
    pub has_avx512f: bool,
    /// CPU supports AVX-512 Double/Quad word instructions.
    pub has_avx512dq: bool,
}

static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Detects CPU features via CPUID, caching the result for the process.
pub fn detect_cpu_features() -> CpuFeatures {
    *CPU_FEATURES.get_or_init(detect_cpu_features_impl)
}

#[cfg(target_arch = "x86_64")]
fn detect_cpu_features_impl() -> CpuFeatures {
    use raw_cpuid::CpuId;

    let cpuid = CpuId::new();
    let mut features = CpuFeatures::default();

    if let Some(feature_info) = cpuid.get_feature_info() {
        features.has_sse2 = feature_info.has_sse2();
        features.has_avx = feature_info.has_avx();
        features.has_fma = feature_info.has_fma();
    }

    if let Some(extended_features) = cpuid.get_extended_feature_info() {
        features.has_avx2 = extended_features.has_avx2();
        features.has_avx512f = extended_features.has_avx512f();
        features.has_avx512dq = extended_features.has_avx512dq();
    }

    features
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_cpu_features_impl() -> CpuFeatures {
    CpuFeatures::default()
}

/// Whether the current CPU supports AVX2.
pub fn has_avx2() -> bool {
    detect_cpu_features().has_avx2
}

/// Whether the current CPU supports AVX-512 (Foundation + DQ).
pub fn has_avx512() -> bool {
    let features = detect_cpu_features();
    features.has_avx512f && features.has_avx512dq
}
