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

/// Errors produced by the sample pool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An asset could not be read from the asset store. Loading skips the
    /// asset and continues with the rest of the set.
    #[error("asset error: {0}")]
    Asset(#[from] crate::assets::AssetError),

    /// Programming misuse, e.g. initializing twice or double-registering a
    /// load completion.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No sample of the requested kind has finished loading yet. Recoverable;
    /// callers typically surface a notice and do nothing.
    #[error("no samples are loaded")]
    NothingLoaded,

    /// The selection queue was empty. Only reachable when playback is
    /// attempted without checking for `NothingLoaded` first.
    #[error("selection queue is empty")]
    EmptyQueue,

    /// The platform engine rejected a load or play request.
    #[error("engine error: {0}")]
    Engine(String),

    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
