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
//! Crate-wide error type.
//!
//! Conditions that are a caller bug given the documented calling convention
//! (a stale index into a store the caller owns) are `debug_assert!`ed instead
//! of represented here — see the module docs on [`crate::store::BodyStore`].

use thiserror::Error;

/// Errors that can escape the engine's public API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A force back-end could not be constructed (no GPU device, driver rejected
    /// the request, etc). Fatal at construction time.
    #[error("back-end unavailable: {reason}")]
    BackendUnavailable {
        /// Human-readable cause, suitable for logging.
        reason: String,
    },

    /// The body store could not grow to hold another body.
    #[error("body store allocation failed")]
    OutOfMemory,

    /// A caller supplied a body with a non-positive or non-finite mass/radius.
    #[error("invalid body: {reason}")]
    InvalidBody {
        /// Human-readable cause.
        reason: String,
    },

    /// The GPU kernel failed to compile or link at back-end construction.
    #[error("gpu kernel build failed: {source}")]
    GpuKernelBuild {
        /// Compiler/validation diagnostic from the GPU driver or shader front-end.
        source: String,
    },
}

/// Convenience alias used throughout the crate's fallible APIs.
pub type Result<T> = std::result::Result<T, EngineError>;
