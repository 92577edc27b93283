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

//! Shared sample pool state.
//!
//! This module provides:
//! - Per-asset load state tracking and handle bookkeeping
//! - The anti-repetition selection queue
//! - The background asset loader

mod loader;
mod queue;
mod registry;

pub use loader::{AssetLoader, LoadPlan};
pub use queue::SelectionQueue;
pub use registry::{Category, LoadState, SampleRegistry};

use crate::engine::SampleHandle;

/// The aggregate guarded by a single mutex. Loader completions and playback
/// calls race on all three pieces, and the exactly-once queue invariant
/// spans them, so they share one mutual-exclusion domain.
pub(crate) struct PoolState {
    pub(crate) registry: SampleRegistry,
    pub(crate) queue: SelectionQueue,
    /// Set exactly once when the long sample's load completes.
    pub(crate) long_slot: Option<SampleHandle>,
}

impl PoolState {
    pub(crate) fn new(window: usize, power: f64) -> PoolState {
        PoolState {
            registry: SampleRegistry::new(),
            queue: SelectionQueue::new(window, power),
            long_slot: None,
        }
    }

    /// Resets everything back to empty. Handles issued before the clear
    /// must not be used afterwards.
    pub(crate) fn clear(&mut self) {
        self.registry.clear();
        self.queue.clear();
        self.long_slot = None;
    }
}
