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

//! Sample pool configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pitch jitter bounds for randomized playback rates.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PitchRange {
    pub min: f32,
    pub max: f32,
}

/// A YAML representation of the sample pool configuration. The defaults
/// reproduce the asset set and tuning this pool ships with; every knob can
/// be overridden individually.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of the indexed regular sample names.
    pub name_prefix: String,

    /// File extension of the regular sample names.
    pub extension: String,

    /// Number of regular samples, named `{prefix}{01..=count}.{ext}`.
    pub regular_count: u32,

    /// Name of the single long sample.
    pub long_name: String,

    /// Lookahead window of the anti-repetition selection. Selection is a
    /// plain round robin until this many samples are loaded.
    pub selection_window: usize,

    /// Power applied to the uniform draw when picking within the window.
    /// Values above 1 bias selection toward the front.
    pub skew_power: f64,

    /// Pitch jitter applied to regular samples.
    pub regular_pitch: PitchRange,

    /// Pitch jitter applied to the long sample.
    pub long_pitch: PitchRange,

    /// Priority passed to the engine when submitting loads.
    pub load_priority: u32,

    /// Maximum simultaneous playback streams. The bounded stream pool is
    /// owned by the platform engine; this is forwarded to whoever
    /// constructs it.
    pub max_streams: u32,

    /// Playback length of the long sample at unit pitch, in milliseconds.
    pub long_duration_ms: u64,

    /// Pre-roll silence at the start of the long recording, in
    /// milliseconds. When set, the haptic pattern waits this long (scaled
    /// by pitch) before vibrating for the remainder.
    pub pre_roll_lead_ms: Option<u64>,
}

fn default_name_prefix() -> String {
    "sample".to_string()
}

fn default_extension() -> String {
    "ogg".to_string()
}

fn default_long_name() -> String {
    "sample_long.ogg".to_string()
}

impl Default for Config {
    fn default() -> Config {
        Config {
            name_prefix: default_name_prefix(),
            extension: default_extension(),
            regular_count: 15,
            long_name: default_long_name(),
            selection_window: 5,
            skew_power: 2.0,
            regular_pitch: PitchRange {
                min: 0.75,
                max: 1.5,
            },
            long_pitch: PitchRange { min: 0.9, max: 1.2 },
            load_priority: 1,
            max_streams: 6,
            long_duration_ms: 3813,
            pre_roll_lead_ms: None,
        }
    }
}

impl Config {
    /// Parses a config from a YAML file and validates it.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let config: Config = serde_yml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regular_count == 0 {
            return Err(ConfigError::Invalid(
                "regular_count must be at least 1".to_string(),
            ));
        }
        if self.selection_window == 0 {
            return Err(ConfigError::Invalid(
                "selection_window must be at least 1".to_string(),
            ));
        }
        if self.skew_power <= 0.0 {
            return Err(ConfigError::Invalid(
                "skew_power must be positive".to_string(),
            ));
        }
        for (name, range) in [
            ("regular_pitch", self.regular_pitch),
            ("long_pitch", self.long_pitch),
        ] {
            if !(range.min > 0.0 && range.min < range.max) {
                return Err(ConfigError::Invalid(format!(
                    "{} must satisfy 0 < min < max, got {}..{}",
                    name, range.min, range.max
                )));
            }
        }
        if let Some(lead) = self.pre_roll_lead_ms {
            if lead >= self.long_duration_ms {
                return Err(ConfigError::Invalid(format!(
                    "pre_roll_lead_ms ({}) must be shorter than long_duration_ms ({})",
                    lead, self.long_duration_ms
                )));
            }
        }
        Ok(())
    }

    /// The names of the regular samples, in load order.
    pub fn regular_names(&self) -> Vec<String> {
        (1..=self.regular_count)
            .map(|i| format!("{}{:02}.{}", self.name_prefix, i, self.extension))
            .collect()
    }
}
