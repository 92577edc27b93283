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

use std::collections::{HashMap, HashSet};
use std::io;

use parking_lot::Mutex;

use super::{AssetError, AssetStore};

/// An in-memory asset store. Assets not explicitly inserted are reported as
/// missing, and individual assets can be made to fail with an I/O error.
#[derive(Default)]
pub struct Store {
    assets: Mutex<HashMap<String, Vec<u8>>>,
    failing: Mutex<HashSet<String>>,
}

impl Store {
    /// Creates an empty mock store.
    pub fn new() -> Store {
        Store::default()
    }

    /// Creates a store holding the given asset names, each with a small
    /// placeholder payload.
    pub fn with_assets<I, S>(names: I) -> Store
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Store::new();
        for name in names {
            store.insert(name, b"mock sample".to_vec());
        }
        store
    }

    /// Inserts an asset.
    pub fn insert<S: Into<String>>(&self, name: S, bytes: Vec<u8>) {
        self.assets.lock().insert(name.into(), bytes);
    }

    /// Makes the named asset fail with an I/O error on open.
    pub fn fail<S: Into<String>>(&self, name: S) {
        self.failing.lock().insert(name.into());
    }
}

impl AssetStore for Store {
    fn open(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        if self.failing.lock().contains(name) {
            return Err(AssetError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected failure",
            )));
        }

        self.assets
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }
}
