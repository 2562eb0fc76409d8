use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Schedule;

pub const DEFAULT_CELL_SIZE: u32 = 5;
pub const DEFAULT_OUTPUT: &str = "Prisoners.png";
pub const DEFAULT_UPDATES_PER_SECOND: u64 = 4;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("temptation b must be a finite number, got {0}")]
    NonFiniteTemptation(f64),
    #[error("temptation b must be positive, got {0}")]
    NonPositiveTemptation(f64),
    #[error("thread count must be at least 1")]
    ZeroThreads,
    #[error("cell size must be at least 1 pixel")]
    ZeroCellSize,
    #[error("viewer update rate must be at least 1 step per second")]
    ZeroUpdateRate,
    #[error("defect ratio must lie in [0, 1], got {0}")]
    DefectRatio(f64),
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Reward for defecting against a cooperator (`b`).
    pub temptation: f64,
    pub steps: usize,
    pub schedule: Schedule,
    /// Size of a dedicated rayon pool; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl SimulationConfig {
    pub fn new(temptation: f64, steps: usize) -> Self {
        SimulationConfig {
            temptation,
            steps,
            schedule: Schedule::default(),
            threads: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temptation.is_finite() {
            return Err(ConfigError::NonFiniteTemptation(self.temptation));
        }
        if self.temptation <= 0.0 {
            return Err(ConfigError::NonPositiveTemptation(self.temptation));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

/// Output settings for the PNG renderer and the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub cell_size: u32,
    pub output: PathBuf,
    pub updates_per_second: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            cell_size: DEFAULT_CELL_SIZE,
            output: PathBuf::from(DEFAULT_OUTPUT),
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.updates_per_second == 0 {
            return Err(ConfigError::ZeroUpdateRate);
        }
        Ok(())
    }
}

pub fn validate_defect_ratio(ratio: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(ConfigError::DefectRatio(ratio))
    }
}
