//! Process-wide configuration handle.

use std::sync::{Arc, PoisonError, RwLock};

use super::{LevelingConfig, Result};

/// Cloneable handle to the single shared [`LevelingConfig`].
///
/// Readers take a snapshot per computation, so an update never tears a
/// calculation that is already running.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<LevelingConfig>>,
}

impl SharedConfig {
    /// Wrap a configuration for sharing.
    pub fn new(config: LevelingConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> LevelingConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read a single value without cloning the whole configuration.
    pub fn read<T>(&self, f: impl FnOnce(&LevelingConfig) -> T) -> T {
        f(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Validate and install a new configuration.
    pub fn replace(&self, config: LevelingConfig) -> Result<()> {
        config.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = config;
        tracing::info!("leveling config replaced");
        Ok(())
    }

    /// Modify the configuration in place. The change is discarded if the
    /// result does not validate.
    pub fn update(&self, f: impl FnOnce(&mut LevelingConfig)) -> Result<()> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = guard.clone();
        f(&mut candidate);
        if let Err(err) = candidate.validate() {
            tracing::warn!(error = %err, "rejected leveling config update");
            return Err(err);
        }
        *guard = candidate;
        Ok(())
    }
}

impl From<LevelingConfig> for SharedConfig {
    fn from(config: LevelingConfig) -> Self {
        Self::new(config)
    }
}
