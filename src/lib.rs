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

//! A pooled one-shot sample player.
//!
//! This crate manages a small set of short audio samples that are loaded
//! asynchronously into a platform audio engine and played back on demand
//! with randomized pitch. Selection over the loaded samples is biased so
//! that recently played samples are unlikely to repeat immediately. A
//! single "long" sample gets a separate path that reports its pitch-shifted
//! playback duration, so a caller can drive a haptic pattern that tracks
//! the audible length.
//!
//! The platform audio engine, the asset store and the haptic device are
//! consumed through traits ([`engine::AudioEngine`], [`assets::AssetStore`]
//! and [`haptics::Haptics`]); mock implementations live next to each trait.

pub mod assets;
pub mod config;
pub mod controller;
pub mod engine;
mod error;
pub mod haptics;
mod pool;
pub mod random;

pub use config::Config;
pub use controller::{Controller, LongPlayback};
pub use engine::{AudioEngine, LoadCompletion, SampleHandle};
pub use error::Error;
pub use pool::{AssetLoader, Category, LoadPlan, LoadState, SampleRegistry, SelectionQueue};
