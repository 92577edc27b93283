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

//! Per-asset load state tracking and handle bookkeeping.

use std::collections::HashMap;

use crate::engine::SampleHandle;
use crate::error::Error;

/// Which sample set an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Regular,
    Long,
}

/// Load state of a single asset. `Failed` is terminal; failed loads are
/// never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

struct AssetRecord {
    category: Category,
    state: LoadState,
    handle: Option<SampleHandle>,
}

/// Tracks each asset's load state and records its engine-issued handle.
#[derive(Default)]
pub struct SampleRegistry {
    assets: HashMap<String, AssetRecord>,
}

impl SampleRegistry {
    /// Creates an empty registry.
    pub fn new() -> SampleRegistry {
        SampleRegistry::default()
    }

    /// Records each asset as unloaded. Must be called before loading
    /// starts; re-registering a known name is a programming error.
    pub fn register<I>(&mut self, names: I, category: Category) -> Result<(), Error>
    where
        I: IntoIterator<Item = String>,
    {
        for name in names {
            if self.assets.contains_key(&name) {
                return Err(Error::InvalidState(format!(
                    "asset {} is already registered",
                    name
                )));
            }
            self.assets.insert(
                name,
                AssetRecord {
                    category,
                    state: LoadState::Unloaded,
                    handle: None,
                },
            );
        }
        Ok(())
    }

    /// Marks an asset as submitted to the engine.
    pub fn mark_loading(&mut self, name: &str) -> Result<(), Error> {
        let record = self.record_mut(name)?;
        if record.state != LoadState::Unloaded {
            return Err(Error::InvalidState(format!(
                "asset {} is not awaiting a load, state is {:?}",
                name, record.state
            )));
        }
        record.state = LoadState::Loading;
        Ok(())
    }

    /// Transitions an asset to loaded and stores its handle, returning the
    /// asset's category so the caller can route the handle. Completing the
    /// same asset twice is a programming error.
    pub fn mark_loaded(&mut self, name: &str, handle: SampleHandle) -> Result<Category, Error> {
        let record = self.record_mut(name)?;
        if record.state == LoadState::Loaded {
            return Err(Error::InvalidState(format!(
                "asset {} is already loaded",
                name
            )));
        }
        record.state = LoadState::Loaded;
        record.handle = Some(handle);
        Ok(record.category)
    }

    /// Marks an asset's load as failed. Unknown names are ignored.
    pub fn mark_failed(&mut self, name: &str) {
        if let Some(record) = self.assets.get_mut(name) {
            record.state = LoadState::Failed;
        }
    }

    /// The number of regular samples currently loaded.
    pub fn regular_loaded_count(&self) -> usize {
        self.assets
            .values()
            .filter(|r| r.category == Category::Regular && r.state == LoadState::Loaded)
            .count()
    }

    /// Whether the long sample's handle has been set.
    pub fn is_long_loaded(&self) -> bool {
        self.assets
            .values()
            .any(|r| r.category == Category::Long && r.state == LoadState::Loaded)
    }

    /// The load state of the named asset, if registered.
    pub fn state(&self, name: &str) -> Option<LoadState> {
        self.assets.get(name).map(|r| r.state)
    }

    /// The handle of the named asset, if loaded.
    pub fn handle(&self, name: &str) -> Option<SampleHandle> {
        self.assets.get(name).and_then(|r| r.handle)
    }

    /// Clears all state back to empty. Previously issued handles are
    /// invalid afterwards.
    pub fn clear(&mut self) {
        self.assets.clear();
    }

    fn record_mut(&mut self, name: &str) -> Result<&mut AssetRecord, Error> {
        self.assets
            .get_mut(name)
            .ok_or_else(|| Error::InvalidState(format!("asset {} is not registered", name)))
    }
}
