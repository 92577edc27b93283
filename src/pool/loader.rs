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

//! Background asset loading.
//!
//! The loader runs on a dedicated thread: it reads each asset from the
//! store, submits the bytes to the engine, and then drains the engine's
//! completion channel into the locked pool state. Load failures are
//! reported and skipped; the pool keeps working with whatever subset did
//! load.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::assets::AssetStore;
use crate::engine::AudioEngine;
use crate::engine::SampleHandle;
use crate::error::Error;

use super::registry::Category;
use super::PoolState;

/// The assets one load pass covers: the indexed regular set plus the single
/// long sample, and the engine priority to submit them with.
pub struct LoadPlan {
    pub regular: Vec<String>,
    pub long: String,
    pub priority: u32,
}

/// Drives one asynchronous load pass over the asset set. One-shot: loading
/// happens once per lifecycle, and a second spawn fails fast.
#[derive(Default)]
pub struct AssetLoader {
    started: AtomicBool,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AssetLoader {
    /// Creates an idle loader.
    pub fn new() -> AssetLoader {
        AssetLoader::default()
    }

    /// Returns true once a load pass has been started.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    /// Starts the background load pass.
    pub(crate) fn spawn(
        &self,
        store: Arc<dyn AssetStore>,
        engine: Arc<dyn AudioEngine>,
        state: Arc<Mutex<PoolState>>,
        plan: LoadPlan,
    ) -> Result<(), Error> {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::InvalidState(
                "asset loading has already been started".to_string(),
            ));
        }

        let handle = thread::spawn(move || load_assets(store, engine, state, plan));
        *self.join.lock() = Some(handle);
        Ok(())
    }

    /// Waits for the load pass to finish. The pass only ends once every
    /// submitted load has completed or the engine has been released, so
    /// this is primarily for teardown and tests.
    pub(crate) fn join(&self) {
        if let Some(handle) = self.join.lock().take() {
            if handle.join().is_err() {
                error!("Loader thread panicked");
            }
        }
    }
}

/// The loader thread body. All registry/queue/slot mutation happens under
/// the pool mutex; completions may arrive in any order and may race with
/// playback calls.
fn load_assets(
    store: Arc<dyn AssetStore>,
    engine: Arc<dyn AudioEngine>,
    state: Arc<Mutex<PoolState>>,
    plan: LoadPlan,
) {
    // Grab the receiver before submitting anything so no completion can
    // slip past the drain loop.
    let completions = engine.completions();
    let mut pending: HashMap<SampleHandle, String> = HashMap::new();

    for name in plan.regular.iter().chain(std::iter::once(&plan.long)) {
        let bytes = match store.open(name) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(asset = name.as_str(), err = %e, "Skipping unreadable asset");
                state.lock().registry.mark_failed(name);
                continue;
            }
        };

        match engine.load(bytes, plan.priority) {
            Ok(handle) => {
                let mut pool = state.lock();
                if let Err(e) = pool.registry.mark_loading(name) {
                    error!(asset = name.as_str(), err = %e, "Inconsistent load submission");
                    continue;
                }
                debug!(asset = name.as_str(), handle = %handle, "Load submitted");
                pending.insert(handle, name.clone());
            }
            Err(e) => {
                warn!(asset = name.as_str(), err = %e, "Engine rejected load");
                state.lock().registry.mark_failed(name);
            }
        }
    }

    let submitted = pending.len();
    let mut loaded = 0usize;

    while !pending.is_empty() {
        let completion = match completions.recv() {
            Ok(completion) => completion,
            Err(_) => {
                debug!("Completion channel disconnected, stopping loader");
                break;
            }
        };

        let name = match pending.remove(&completion.handle) {
            Some(name) => name,
            None => {
                debug!(handle = %completion.handle, "Ignoring completion for unknown handle");
                continue;
            }
        };

        let mut pool = state.lock();
        if !completion.success {
            warn!(asset = name.as_str(), "Sample failed to decode");
            pool.registry.mark_failed(&name);
            continue;
        }

        match pool.registry.mark_loaded(&name, completion.handle) {
            Ok(Category::Regular) => {
                if let Err(e) = pool.queue.enqueue(completion.handle) {
                    error!(asset = name.as_str(), err = %e, "Loaded handle was already enqueued");
                    continue;
                }
                loaded += 1;
            }
            Ok(Category::Long) => {
                pool.long_slot = Some(completion.handle);
                loaded += 1;
            }
            Err(e) => {
                error!(asset = name.as_str(), err = %e, "Inconsistent load completion");
            }
        }
    }

    info!(loaded, submitted, "Asset loading finished");
}

#[cfg(test)]
mod test {
    use crate::assets::mock as mock_store;
    use crate::engine::mock as mock_engine;
    use crate::pool::LoadState;
    use crate::test::eventually;

    use super::*;

    fn plan(regular: &[&str], long: &str) -> LoadPlan {
        LoadPlan {
            regular: regular.iter().map(|s| s.to_string()).collect(),
            long: long.to_string(),
            priority: 1,
        }
    }

    fn registered_state(plan: &LoadPlan) -> Arc<Mutex<PoolState>> {
        let mut pool = PoolState::new(5, 2.0);
        pool.registry
            .register(plan.regular.clone(), Category::Regular)
            .expect("register failed");
        pool.registry
            .register(vec![plan.long.clone()], Category::Long)
            .expect("register failed");
        Arc::new(Mutex::new(pool))
    }

    #[test]
    fn test_loads_complete_in_reverse_order() -> Result<(), Error> {
        let names: Vec<String> = (1..=15).map(|i| format!("sample{:02}.ogg", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let plan = plan(&name_refs, "sample_long.ogg");

        let store = Arc::new(mock_store::Store::with_assets(
            names.iter().cloned().chain(["sample_long.ogg".to_string()]),
        ));
        let engine = Arc::new(mock_engine::Engine::manual(6));
        let state = registered_state(&plan);

        let loader = AssetLoader::new();
        loader.spawn(store, engine.clone(), state.clone(), plan)?;

        // Wait for all 16 submissions, then complete them back to front.
        eventually(
            || engine.pending().len() == 16,
            "loads were never submitted",
        );
        for handle in engine.pending().into_iter().rev() {
            engine.complete(handle);
        }
        loader.join();

        let pool = state.lock();
        assert_eq!(pool.registry.regular_loaded_count(), 15);
        assert!(pool.registry.is_long_loaded());
        assert!(pool.long_slot.is_some());
        assert_eq!(pool.queue.len(), 15);
        Ok(())
    }

    #[test]
    fn test_unreadable_asset_is_skipped() -> Result<(), Error> {
        let names: Vec<String> = (1..=15).map(|i| format!("sample{:02}.ogg", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let plan = plan(&name_refs, "sample_long.ogg");

        let store = Arc::new(mock_store::Store::with_assets(
            names.iter().cloned().chain(["sample_long.ogg".to_string()]),
        ));
        store.fail("sample07.ogg");
        let engine = Arc::new(mock_engine::Engine::new(6));
        let state = registered_state(&plan);

        let loader = AssetLoader::new();
        loader.spawn(store, engine, state.clone(), plan)?;
        loader.join();

        let pool = state.lock();
        assert_eq!(pool.registry.regular_loaded_count(), 14);
        assert_eq!(
            pool.registry.state("sample07.ogg"),
            Some(LoadState::Failed)
        );
        assert!(pool.registry.is_long_loaded());
        Ok(())
    }

    #[test]
    fn test_failed_decode_is_skipped() -> Result<(), Error> {
        let plan = plan(&["a.ogg", "b.ogg"], "long.ogg");
        let store = Arc::new(mock_store::Store::with_assets([
            "a.ogg", "b.ogg", "long.ogg",
        ]));
        let engine = Arc::new(mock_engine::Engine::manual(6));
        let state = registered_state(&plan);

        let loader = AssetLoader::new();
        loader.spawn(store, engine.clone(), state.clone(), plan)?;

        eventually(
            || engine.pending().len() == 3,
            "loads were never submitted",
        );
        let pending = engine.pending();
        engine.fail(pending[0]);
        engine.complete(pending[1]);
        engine.complete(pending[2]);
        loader.join();

        let pool = state.lock();
        assert_eq!(pool.registry.state("a.ogg"), Some(LoadState::Failed));
        assert_eq!(pool.registry.regular_loaded_count(), 1);
        assert!(pool.registry.is_long_loaded());
        Ok(())
    }

    #[test]
    fn test_release_stops_the_loader() -> Result<(), Error> {
        let plan = plan(&["a.ogg"], "long.ogg");
        let store = Arc::new(mock_store::Store::with_assets(["a.ogg", "long.ogg"]));
        let engine = Arc::new(mock_engine::Engine::manual(6));
        let state = registered_state(&plan);

        let loader = AssetLoader::new();
        loader.spawn(store, engine.clone(), state.clone(), plan)?;

        eventually(
            || engine.pending().len() == 2,
            "loads were never submitted",
        );
        engine.release();
        // The disconnected channel must end the pass even though no
        // completion ever arrived.
        loader.join();

        let pool = state.lock();
        assert_eq!(pool.registry.regular_loaded_count(), 0);
        assert_eq!(pool.registry.state("a.ogg"), Some(LoadState::Loading));
        Ok(())
    }

    #[test]
    fn test_second_spawn_fails_fast() -> Result<(), Error> {
        let plan_a = plan(&["a.ogg"], "long.ogg");
        let plan_b = plan(&["a.ogg"], "long.ogg");
        let store = Arc::new(mock_store::Store::with_assets(["a.ogg", "long.ogg"]));
        let engine = Arc::new(mock_engine::Engine::new(6));
        let state = registered_state(&plan_a);

        let loader = AssetLoader::new();
        loader.spawn(store.clone(), engine.clone(), state.clone(), plan_a)?;
        assert!(matches!(
            loader.spawn(store, engine, state, plan_b),
            Err(Error::InvalidState(_))
        ));
        loader.join();
        Ok(())
    }
}
