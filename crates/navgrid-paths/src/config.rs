//! Pathfinding service settings.

use crate::error::ConfigError;
use crate::postprocess::PathSmoothing;

/// How finished path requests reach their agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RequestStrategy {
    /// Compute and deliver inside the request call.
    Blocking,
    /// Collect requests; the next drain waits for all of them.
    Batch,
    /// Each drain delivers whatever has finished so far.
    #[default]
    Polling,
}

/// Scratch pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Free-list slots reserved up front.
    pub initial_capacity: usize,
    /// Largest number of idle scratch records kept for reuse.
    pub max_size: usize,
    /// Scratch records built when the pool is created.
    pub prewarm: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            max_size: 1000,
            prewarm: 0,
        }
    }
}

/// Settings for a [`PathfindingService`](crate::PathfindingService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfindingConfig {
    pub strategy: RequestStrategy,
    pub smoothing: PathSmoothing,
    pub pool: PoolConfig,
    /// Worker threads for searches; `0` means one per available core.
    pub worker_threads: usize,
}

impl PathfindingConfig {
    /// Check the settings for values no service can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.max_size == 0 {
            return Err(ConfigError::Invalid("pool.max_size must be at least 1".into()));
        }
        if self.pool.prewarm > self.pool.max_size {
            return Err(ConfigError::Invalid(format!(
                "pool.prewarm ({}) exceeds pool.max_size ({})",
                self.pool.prewarm, self.pool.max_size
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML. Missing keys take their
    /// defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
