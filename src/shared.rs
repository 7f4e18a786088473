//! Shared engine instance lifecycle.
//!
//! Constructing the engine loads multi-gigabyte model weights, so all nodes
//! share a single instance that is built on first use and torn down only on
//! request. First construction is guarded by a mutex; the original contract
//! ("at most one live instance, shared everywhere") is unchanged, only the
//! first-access race is gone.

use std::sync::{Arc, Mutex, OnceLock};

use crate::engine::{EngineConfig, SpeechEngine};
use crate::error::{NodeError, Result};
use crate::handle::EngineHandle;

/// Builds the concrete engine for a given configuration.
pub type EngineFactory =
    Box<dyn Fn(&EngineConfig) -> Result<Box<dyn SpeechEngine>> + Send + Sync>;

/// Lazily constructed, shared engine instance.
///
/// `acquire` hands every caller the same handle until `release` or `reload`
/// drops it; the next `acquire` then rebuilds from scratch. Neither teardown
/// call rebuilds eagerly.
pub struct SharedEngine {
    config: EngineConfig,
    factory: EngineFactory,
    cell: Mutex<Option<Arc<Mutex<EngineHandle>>>>,
}

impl SharedEngine {
    pub fn new(config: EngineConfig, factory: EngineFactory) -> Self {
        Self {
            config,
            factory,
            cell: Mutex::new(None),
        }
    }

    /// Get the live handle, constructing the engine if none exists.
    ///
    /// Construction failures propagate untouched and are fatal for the
    /// calling operation; nothing is retried and no instance is retained.
    pub fn acquire(&self) -> Result<Arc<Mutex<EngineHandle>>> {
        let mut cell = self.cell.lock().expect("engine cell poisoned");
        if let Some(handle) = cell.as_ref() {
            return Ok(Arc::clone(handle));
        }

        log::info!(
            "Constructing shared engine from {}",
            self.config.model_dir.display()
        );
        let engine = (self.factory)(&self.config)?;
        let handle = Arc::new(Mutex::new(EngineHandle::new(engine, &self.config)?));
        *cell = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Drop the live instance so its accelerator memory is freed.
    ///
    /// No-op when nothing is live. Callers still holding an `Arc` keep the
    /// old engine alive until they drop it, but every new `acquire` builds a
    /// fresh one.
    pub fn release(&self) {
        let mut cell = self.cell.lock().expect("engine cell poisoned");
        if cell.take().is_some() {
            log::info!("Released shared engine instance");
        }
    }

    /// Mark the instance as not-yet-constructed; the next `acquire`
    /// rebuilds it.
    pub fn reload(&self) {
        self.release();
    }

    /// Configuration the factory is called with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True if an instance is currently live.
    pub fn is_live(&self) -> bool {
        self.cell.lock().expect("engine cell poisoned").is_some()
    }
}

static GLOBAL: OnceLock<SharedEngine> = OnceLock::new();

/// Install the process-wide shared engine.
///
/// The host calls this once during plugin initialization, before any node
/// executes. Subsequent calls are ignored; the first installation wins.
pub fn install(config: EngineConfig, factory: EngineFactory) {
    if GLOBAL.set(SharedEngine::new(config, factory)).is_err() {
        log::warn!("Shared engine already installed; ignoring reinstall");
    }
}

/// The process-wide shared engine, or `ConstructionFailed` before `install`.
pub fn global() -> Result<&'static SharedEngine> {
    GLOBAL.get().ok_or_else(|| {
        NodeError::ConstructionFailed("no engine factory installed".to_string())
    })
}
