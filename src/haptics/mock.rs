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

use std::time::Duration;

use parking_lot::Mutex;

use super::Haptics;

/// A recorded haptic invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vibration {
    One(Duration),
    Pattern(Vec<Duration>),
}

/// A mock haptic device. Doesn't vibrate anything; records invocations.
#[derive(Default)]
pub struct Device {
    vibrations: Mutex<Vec<Vibration>>,
}

impl Device {
    /// Creates a new mock device.
    pub fn new() -> Device {
        Device::default()
    }

    /// All vibrations requested so far.
    pub fn vibrations(&self) -> Vec<Vibration> {
        self.vibrations.lock().clone()
    }

    /// The most recent vibration request.
    pub fn last_vibration(&self) -> Option<Vibration> {
        self.vibrations.lock().last().cloned()
    }
}

impl Haptics for Device {
    fn vibrate(&self, duration: Duration) {
        self.vibrations.lock().push(Vibration::One(duration));
    }

    fn vibrate_pattern(&self, pattern: &[Duration]) {
        self.vibrations
            .lock()
            .push(Vibration::Pattern(pattern.to_vec()));
    }
}
