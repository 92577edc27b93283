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

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::Error;

use super::{AudioEngine, LoadCompletion, SampleHandle};

/// A play command recorded by the mock engine.
#[derive(Debug, Clone, Copy)]
pub struct PlayCommand {
    pub handle: SampleHandle,
    pub volume: f32,
    pub loop_count: i32,
    pub priority: u32,
    pub rate: f32,
}

/// A mock engine. Doesn't decode or play anything; it issues sequential
/// handles and records play commands for inspection.
///
/// In auto-complete mode every load succeeds immediately. In manual mode
/// ([`Engine::manual`]) loads stay pending until the test delivers
/// completions via [`Engine::complete`] or [`Engine::fail`], in whatever
/// order it likes.
pub struct Engine {
    max_streams: u32,
    auto_complete: bool,
    next_handle: AtomicU32,
    released: AtomicBool,
    pending: Mutex<Vec<SampleHandle>>,
    plays: Mutex<Vec<PlayCommand>>,
    tx: Mutex<Option<Sender<LoadCompletion>>>,
    rx: Receiver<LoadCompletion>,
}

impl Engine {
    /// Creates a mock engine that completes every load immediately.
    pub fn new(max_streams: u32) -> Engine {
        Engine::create(max_streams, true)
    }

    /// Creates a mock engine whose load completions are delivered manually.
    pub fn manual(max_streams: u32) -> Engine {
        Engine::create(max_streams, false)
    }

    fn create(max_streams: u32, auto_complete: bool) -> Engine {
        let (tx, rx) = unbounded();
        Engine {
            max_streams,
            auto_complete,
            next_handle: AtomicU32::new(1),
            released: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
            plays: Mutex::new(Vec::new()),
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    /// The maximum simultaneous stream count this engine was created with.
    pub fn max_streams(&self) -> u32 {
        self.max_streams
    }

    /// Handles of loads that have been submitted but not completed, in
    /// submission order.
    pub fn pending(&self) -> Vec<SampleHandle> {
        self.pending.lock().clone()
    }

    /// Delivers a successful completion for the given pending load.
    pub fn complete(&self, handle: SampleHandle) {
        self.finish(handle, true);
    }

    /// Delivers a failed completion for the given pending load.
    pub fn fail(&self, handle: SampleHandle) {
        self.finish(handle, false);
    }

    fn finish(&self, handle: SampleHandle, success: bool) {
        self.pending.lock().retain(|h| *h != handle);
        if let Some(tx) = self.tx.lock().as_ref() {
            let _ = tx.send(LoadCompletion { handle, success });
        }
    }

    /// All play commands issued so far.
    pub fn plays(&self) -> Vec<PlayCommand> {
        self.plays.lock().clone()
    }

    /// The most recent play command.
    pub fn last_play(&self) -> Option<PlayCommand> {
        self.plays.lock().last().copied()
    }

    /// Returns true once the engine has been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Relaxed)
    }
}

impl AudioEngine for Engine {
    fn load(&self, _data: Vec<u8>, _priority: u32) -> Result<SampleHandle, Error> {
        if self.is_released() {
            return Err(Error::Engine("engine has been released".to_string()));
        }

        let handle = SampleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        if self.auto_complete {
            if let Some(tx) = self.tx.lock().as_ref() {
                let _ = tx.send(LoadCompletion {
                    handle,
                    success: true,
                });
            }
        } else {
            self.pending.lock().push(handle);
        }
        Ok(handle)
    }

    fn completions(&self) -> Receiver<LoadCompletion> {
        self.rx.clone()
    }

    fn play(
        &self,
        handle: SampleHandle,
        volume: f32,
        loop_count: i32,
        priority: u32,
        rate: f32,
    ) -> Result<(), Error> {
        if self.is_released() {
            return Err(Error::Engine("engine has been released".to_string()));
        }

        self.plays.lock().push(PlayCommand {
            handle,
            volume,
            loop_count,
            priority,
            rate,
        });
        Ok(())
    }

    fn release(&self) {
        self.released.store(true, Ordering::Relaxed);
        // Dropping the sender disconnects the completion channel.
        self.tx.lock().take();
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock engine ({} streams)", self.max_streams)
    }
}
