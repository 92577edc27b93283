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

//! Anti-repetition ordering over loaded sample handles.

use std::collections::VecDeque;

use rand::Rng;

use crate::engine::SampleHandle;
use crate::error::Error;
use crate::random;

/// An ordered sequence of sample handles, FIFO by default, reordered by
/// [`SelectionQueue::select_next`]. Holds each loaded regular handle
/// exactly once.
///
/// Selection picks near the front of a short lookahead window with
/// probability weighted toward "soonest", which makes recently played
/// handles unlikely to repeat without turning the rotation fully fixed.
pub struct SelectionQueue {
    entries: VecDeque<SampleHandle>,
    window: usize,
    power: f64,
}

impl SelectionQueue {
    /// Creates an empty queue with the given lookahead window and skew
    /// power.
    pub fn new(window: usize, power: f64) -> SelectionQueue {
        SelectionQueue {
            entries: VecDeque::new(),
            window,
            power,
        }
    }

    /// Appends a newly loaded handle to the tail. Each handle may only be
    /// enqueued once.
    pub fn enqueue(&mut self, handle: SampleHandle) -> Result<(), Error> {
        if self.entries.contains(&handle) {
            return Err(Error::InvalidState(format!(
                "handle {} is already enqueued",
                handle
            )));
        }
        self.entries.push_back(handle);
        Ok(())
    }

    /// Selects the next handle to play and moves it to the tail. The queue
    /// length and the relative order of all other entries are unchanged.
    ///
    /// Below `window` entries this is a pure round robin, so at least
    /// `window` distinct handles cycle before the repetition bias kicks
    /// in. At `window` entries and beyond, the element at a skew-picked
    /// position within the front window is chosen.
    pub fn select_next<R: Rng>(&mut self, rng: &mut R) -> Result<SampleHandle, Error> {
        if self.entries.is_empty() {
            return Err(Error::EmptyQueue);
        }

        let skip = if self.entries.len() < self.window {
            0
        } else {
            random::mapped_index_with(rng, self.window, self.power)
        };

        // skip is always below the queue length.
        let handle = self.entries.remove(skip).ok_or(Error::EmptyQueue)?;
        self.entries.push_back(handle);
        Ok(handle)
    }

    /// The number of enqueued handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no handles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all handles.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The queued handles from head to tail.
    pub fn handles(&self) -> Vec<SampleHandle> {
        self.entries.iter().copied().collect()
    }
}
