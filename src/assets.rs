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

//! The asset store boundary: raw sample bytes by name.

use std::fs;
use std::io;
use std::path::PathBuf;

pub mod mock;

/// Errors from the asset store.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset unreadable: {0}")]
    Io(#[from] io::Error),
}

/// Supplies raw sample bytes by name.
pub trait AssetStore: Send + Sync {
    /// Reads the full contents of the named asset.
    fn open(&self, name: &str) -> Result<Vec<u8>, AssetError>;
}

/// An asset store backed by a directory on disk.
pub struct FsAssetStore {
    base: PathBuf,
}

impl FsAssetStore {
    /// Creates a store that resolves asset names relative to `base`.
    pub fn new<P: Into<PathBuf>>(base: P) -> FsAssetStore {
        FsAssetStore { base: base.into() }
    }
}

impl AssetStore for FsAssetStore {
    fn open(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.base.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(name.to_string()))
            }
            Err(e) => Err(AssetError::Io(e)),
        }
    }
}
