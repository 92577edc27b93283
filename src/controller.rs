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

//! The caller-facing playback controller.
//!
//! Orchestrates sample selection, pitch randomization and playback, and
//! computes the pitch-shifted duration of the long sample for haptic
//! synchronization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, span, Level, Span};

use crate::assets::AssetStore;
use crate::config::Config;
use crate::engine::AudioEngine;
use crate::error::Error;
use crate::haptics::Haptics;
use crate::pool::{AssetLoader, Category, LoadPlan, PoolState};
use crate::random;

/// Play requests always go out at full volume, played once.
const PLAY_VOLUME: f32 = 1.0;
const PLAY_LOOP_COUNT: i32 = 0;
const PLAY_PRIORITY: u32 = 0;

/// Timing of a long sample playback at its randomized pitch. `lead` is
/// zero unless a pre-roll is configured; `tail` covers the audible part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPlayback {
    pub lead: Duration,
    pub tail: Duration,
}

impl LongPlayback {
    /// The full playback duration.
    pub fn total(&self) -> Duration {
        self.lead + self.tail
    }
}

/// Plays pooled one-shot samples through the platform engine.
pub struct Controller {
    /// The pool configuration.
    config: Config,
    /// The engine to load into and play through.
    engine: Arc<dyn AudioEngine>,
    /// The store supplying raw sample bytes.
    store: Arc<dyn AssetStore>,
    /// The haptic device to drive during long sample playback, if any.
    haptics: Option<Arc<dyn Haptics>>,
    /// Registry, selection queue and long slot under one lock.
    state: Arc<Mutex<PoolState>>,
    /// The background loader. One-shot per controller lifecycle.
    loader: AssetLoader,
    /// Set by teardown; the controller is done afterwards.
    torn_down: AtomicBool,
    /// The logging span.
    span: Span,
}

impl Controller {
    /// Creates a new controller. No loading happens until
    /// [`Controller::initialize`] is called.
    pub fn new(
        config: Config,
        engine: Arc<dyn AudioEngine>,
        store: Arc<dyn AssetStore>,
        haptics: Option<Arc<dyn Haptics>>,
    ) -> Result<Controller, Error> {
        config.validate()?;

        let state = Arc::new(Mutex::new(PoolState::new(
            config.selection_window,
            config.skew_power,
        )));
        Ok(Controller {
            config,
            engine,
            store,
            haptics,
            state,
            loader: AssetLoader::new(),
            torn_down: AtomicBool::new(false),
            span: span!(Level::INFO, "sample pool"),
        })
    }

    /// Registers the configured asset set and starts loading it in the
    /// background. Playback can be attempted immediately; it reports
    /// [`Error::NothingLoaded`] until the first sample arrives.
    pub fn initialize(&self) -> Result<(), Error> {
        let _enter = self.span.enter();

        if self.torn_down.load(Ordering::Relaxed) {
            return Err(Error::InvalidState(
                "controller has been torn down".to_string(),
            ));
        }
        if self.loader.is_started() {
            return Err(Error::InvalidState(
                "controller is already initialized".to_string(),
            ));
        }

        let regular = self.config.regular_names();
        let long = self.config.long_name.clone();
        {
            let mut pool = self.state.lock();
            pool.registry
                .register(regular.iter().cloned(), Category::Regular)?;
            pool.registry
                .register(std::iter::once(long.clone()), Category::Long)?;
        }

        info!(
            regular = regular.len(),
            long = long.as_str(),
            "Starting asset load"
        );
        self.loader.spawn(
            self.store.clone(),
            self.engine.clone(),
            self.state.clone(),
            LoadPlan {
                regular,
                long,
                priority: self.config.load_priority,
            },
        )
    }

    /// Plays the next regular sample at a randomized pitch.
    pub fn play_regular(&self) -> Result<(), Error> {
        let _enter = self.span.enter();

        let handle = {
            let mut pool = self.state.lock();
            if pool.registry.regular_loaded_count() == 0 {
                return Err(Error::NothingLoaded);
            }
            pool.queue.select_next(&mut rand::thread_rng())?
        };

        let rate = random::float_between(
            self.config.regular_pitch.min,
            self.config.regular_pitch.max,
        );
        debug!(handle = %handle, rate, "Playing regular sample");
        self.engine
            .play(handle, PLAY_VOLUME, PLAY_LOOP_COUNT, PLAY_PRIORITY, rate)
    }

    /// Plays the long sample at a randomized pitch, drives the haptic
    /// device for its pitch-shifted duration, and returns the timing so
    /// the caller can synchronize too.
    pub fn play_long(&self) -> Result<LongPlayback, Error> {
        let _enter = self.span.enter();

        let handle = {
            let pool = self.state.lock();
            pool.long_slot.ok_or(Error::NothingLoaded)?
        };

        let rate = random::float_between(self.config.long_pitch.min, self.config.long_pitch.max);
        self.engine
            .play(handle, PLAY_VOLUME, PLAY_LOOP_COUNT, PLAY_PRIORITY, rate)?;

        let playback = self.long_playback(rate);
        if let Some(haptics) = &self.haptics {
            if playback.lead.is_zero() {
                haptics.vibrate(playback.tail);
            } else {
                haptics.vibrate_pattern(&[playback.lead, playback.tail]);
            }
        }

        debug!(
            handle = %handle,
            rate,
            duration_ms = playback.total().as_millis() as u64,
            "Playing long sample"
        );
        Ok(playback)
    }

    /// The number of regular samples currently loaded.
    pub fn regular_loaded_count(&self) -> usize {
        self.state.lock().registry.regular_loaded_count()
    }

    /// Whether the long sample is ready to play.
    pub fn is_long_loaded(&self) -> bool {
        self.state.lock().long_slot.is_some()
    }

    /// Releases the engine and clears all pool state. Handles issued
    /// before the teardown are invalid afterwards. Idempotent; the
    /// controller cannot be re-initialized.
    pub fn teardown(&self) {
        let _enter = self.span.enter();

        if self.torn_down.swap(true, Ordering::Relaxed) {
            return;
        }

        info!("Releasing sample pool");
        // Releasing disconnects the completion channel, which ends any
        // in-flight load pass.
        self.engine.release();
        self.loader.join();
        self.state.lock().clear();
    }

    /// Computes the haptic timing of a long playback at the given rate.
    /// A faster rate shortens the audible part; a configured pre-roll lead
    /// scales with the rate instead, since the silence sits in the
    /// recording ahead of the sound.
    fn long_playback(&self, rate: f32) -> LongPlayback {
        let base_ms = self.config.long_duration_ms as f64;
        match self.config.pre_roll_lead_ms {
            Some(lead_base) => {
                let lead_ms = lead_base as f64 * rate as f64;
                let tail_ms = (base_ms - lead_base as f64) / rate as f64;
                LongPlayback {
                    lead: Duration::from_millis(lead_ms as u64),
                    tail: Duration::from_millis(tail_ms as u64),
                }
            }
            None => LongPlayback {
                lead: Duration::ZERO,
                tail: Duration::from_millis((base_ms / rate as f64) as u64),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::assets::mock as mock_store;
    use crate::engine::mock as mock_engine;
    use crate::haptics::mock::{self as mock_haptics, Vibration};
    use crate::test::eventually;

    use super::*;

    struct Fixture {
        controller: Controller,
        engine: Arc<mock_engine::Engine>,
        store: Arc<mock_store::Store>,
        haptics: Arc<mock_haptics::Device>,
    }

    /// A controller over a fully stocked mock store and an auto-completing
    /// mock engine.
    fn fixture(config: Config) -> Fixture {
        let mut names = config.regular_names();
        names.push(config.long_name.clone());
        let store = Arc::new(mock_store::Store::with_assets(names));
        let engine = Arc::new(mock_engine::Engine::new(config.max_streams));
        let haptics = Arc::new(mock_haptics::Device::new());
        let controller = Controller::new(
            config,
            engine.clone(),
            store.clone(),
            Some(haptics.clone() as Arc<dyn Haptics>),
        )
        .expect("controller creation failed");
        Fixture {
            controller,
            engine,
            store,
            haptics,
        }
    }

    fn initialized(config: Config) -> Fixture {
        let fixture = self::fixture(config);
        fixture.controller.initialize().expect("initialize failed");
        eventually(
            || fixture.controller.regular_loaded_count() == 15 && fixture.controller.is_long_loaded(),
            "samples never finished loading",
        );
        fixture
    }

    #[test]
    fn test_play_before_anything_loads_reports_nothing_loaded() {
        let fixture = fixture(Config::default());

        // Not initialized yet: nothing is loaded, nothing is played.
        assert!(matches!(
            fixture.controller.play_regular(),
            Err(Error::NothingLoaded)
        ));
        assert!(matches!(
            fixture.controller.play_long(),
            Err(Error::NothingLoaded)
        ));
        assert!(fixture.engine.plays().is_empty());
    }

    #[test]
    fn test_initialize_loads_everything() {
        let fixture = initialized(Config::default());
        assert_eq!(fixture.controller.regular_loaded_count(), 15);
        assert!(fixture.controller.is_long_loaded());
    }

    #[test]
    fn test_double_initialize_fails_fast() {
        let fixture = initialized(Config::default());
        assert!(matches!(
            fixture.controller.initialize(),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_play_regular_randomizes_pitch_within_bounds() -> Result<(), Error> {
        let fixture = initialized(Config::default());

        for _ in 0..50 {
            fixture.controller.play_regular()?;
        }
        let plays = fixture.engine.plays();
        assert_eq!(plays.len(), 50);
        for play in plays {
            assert!((0.75..1.5).contains(&play.rate), "rate {}", play.rate);
            assert_eq!(play.volume, 1.0);
            assert_eq!(play.loop_count, 0);
        }
        Ok(())
    }

    #[test]
    fn test_play_regular_avoids_quick_repeats() -> Result<(), Error> {
        let fixture = initialized(Config::default());

        for _ in 0..20 {
            fixture.controller.play_regular()?;
        }

        // The queue holds 15 handles, so any 5 consecutive plays must hit
        // 5 distinct samples.
        let handles: Vec<_> = fixture.engine.plays().iter().map(|p| p.handle).collect();
        for window in handles.windows(5) {
            let mut sorted = window.to_vec();
            sorted.sort_by_key(|h| h.0);
            sorted.dedup();
            assert_eq!(sorted.len(), 5, "repeat within window: {:?}", window);
        }
        Ok(())
    }

    #[test]
    fn test_partial_load_still_plays() -> Result<(), Error> {
        let config = Config::default();
        let fixture = fixture(config.clone());
        fixture.store.fail("sample03.ogg");
        fixture.controller.initialize()?;

        eventually(
            || fixture.controller.regular_loaded_count() == 14 && fixture.controller.is_long_loaded(),
            "samples never finished loading",
        );
        fixture.controller.play_regular()?;
        assert_eq!(fixture.engine.plays().len(), 1);
        Ok(())
    }

    #[test]
    fn test_play_long_duration_tracks_pitch() -> Result<(), Error> {
        let fixture = initialized(Config::default());

        for _ in 0..20 {
            let playback = fixture.controller.play_long()?;
            let rate = fixture.engine.last_play().expect("no play issued").rate;
            assert!((0.9..1.2).contains(&rate), "rate {}", rate);
            assert_eq!(playback.lead, Duration::ZERO);

            // duration = base / rate, so duration * rate recovers the base
            // within integer-millisecond rounding.
            let recovered = playback.total().as_millis() as f64 * rate as f64;
            assert!(
                (recovered - 3813.0).abs() < 3.0,
                "duration {:?} does not track rate {}",
                playback.total(),
                rate
            );

            assert_eq!(
                fixture.haptics.last_vibration(),
                Some(Vibration::One(playback.tail))
            );
        }
        Ok(())
    }

    #[test]
    fn test_play_long_with_pre_roll_vibrates_in_two_phases() -> Result<(), Error> {
        let config = Config {
            pre_roll_lead_ms: Some(55),
            ..Config::default()
        };
        let fixture = initialized(config);

        let playback = fixture.controller.play_long()?;
        let rate = fixture.engine.last_play().expect("no play issued").rate;

        // The pre-roll sits in the recording, so it scales with the rate;
        // the audible tail shrinks as the rate grows.
        let expected_lead = (55.0 * rate as f64) as u64;
        let expected_tail = (3758.0 / rate as f64) as u64;
        assert_eq!(playback.lead.as_millis() as u64, expected_lead);
        assert_eq!(playback.tail.as_millis() as u64, expected_tail);

        assert_eq!(
            fixture.haptics.last_vibration(),
            Some(Vibration::Pattern(vec![playback.lead, playback.tail]))
        );
        Ok(())
    }

    #[test]
    fn test_teardown_clears_the_pool() -> Result<(), Error> {
        let fixture = initialized(Config::default());
        fixture.controller.teardown();

        assert!(fixture.engine.is_released());
        assert_eq!(fixture.controller.regular_loaded_count(), 0);
        assert!(!fixture.controller.is_long_loaded());
        assert!(matches!(
            fixture.controller.play_regular(),
            Err(Error::NothingLoaded)
        ));
        assert!(matches!(
            fixture.controller.initialize(),
            Err(Error::InvalidState(_))
        ));

        // A second teardown is a no-op.
        fixture.controller.teardown();
        Ok(())
    }

    #[test]
    fn test_long_playback_math() -> Result<(), Error> {
        let fixture = fixture(Config::default());

        let playback = fixture.controller.long_playback(1.0);
        assert_eq!(playback.total(), Duration::from_millis(3813));

        // Doubling the rate halves the duration.
        let fast = fixture.controller.long_playback(2.0);
        assert_eq!(fast.total(), Duration::from_millis(1906));
        Ok(())
    }
}
