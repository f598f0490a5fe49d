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
//! External scene abstraction: the only surface the controller depends on
//! for rendering. Nothing visual lives in this crate; a consumer provides an
//! implementation and the controller drives it from tick packets.

use crate::body::{Body, BodyId};

/// Rendering-side operations the controller replays tick packets against.
pub trait Scene {
    /// A body was created; add its visual.
    fn add(&mut self, id: BodyId, body: Body);

    /// A body was absorbed in a merge; remove its visual.
    fn remove(&mut self, id: BodyId);

    /// A body moved; reposition its visual.
    fn set_pos(&mut self, id: BodyId, x: f64, y: f64);

    /// A body's radius changed (the survivor of a merge); resize its visual.
    fn set_radius(&mut self, id: BodyId, r: f64);
}
