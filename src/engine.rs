// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! The platform audio engine boundary.
//!
//! The engine owns decoding and the bounded pool of simultaneous playback
//! streams. Loads are asynchronous: `load` returns the handle immediately,
//! and the matching [`LoadCompletion`] arrives later on the completion
//! channel, in any order relative to other loads.

use std::fmt;

use crossbeam_channel::Receiver;

use crate::error::Error;

pub mod mock;

/// Opaque identifier issued by the platform engine for a submitted sample.
/// Valid until the engine is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleHandle(pub(crate) u32);

impl fmt::Display for SampleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion notice for an asynchronous sample load.
#[derive(Debug, Clone, Copy)]
pub struct LoadCompletion {
    /// The handle the completed load was submitted under.
    pub handle: SampleHandle,
    /// Whether the engine decoded the sample successfully.
    pub success: bool,
}

/// The platform audio engine.
pub trait AudioEngine: Send + Sync {
    /// Submits raw sample bytes for decoding. The returned handle is
    /// assigned immediately but must not be played until the matching
    /// completion has arrived on the completion channel.
    fn load(&self, data: Vec<u8>, priority: u32) -> Result<SampleHandle, Error>;

    /// The channel on which load completions are delivered. Disconnects
    /// when the engine is released.
    fn completions(&self) -> Receiver<LoadCompletion>;

    /// Issues a play command for a loaded sample. `rate` of 1.0 plays at
    /// the recorded pitch; `loop_count` of 0 plays once.
    fn play(
        &self,
        handle: SampleHandle,
        volume: f32,
        loop_count: i32,
        priority: u32,
        rate: f32,
    ) -> Result<(), Error>;

    /// Frees all engine resources. Handles issued before the release are
    /// invalid afterwards.
    fn release(&self);
}
