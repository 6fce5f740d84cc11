//! Configuration for grid generation, the CCD solver and the waypoint driver
//!
//! Files are YAML or TOML, picked by extension. Every field has a default,
//! so a file only needs to name what it changes:
//!
//! ```yaml
//! grid:
//!   width: 21
//!   height: 21
//!   seed: 42
//! solver:
//!   clamp_to_limits: false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MazeArmError, MazeArmResult};

/// Grid generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Seed for the carving shuffle; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            seed: None,
        }
    }
}

/// CCD solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Outer passes over the chain per solve call
    ///
    /// Default: 100
    pub max_iterations: usize,

    /// End-effector distance below which a solve converges
    ///
    /// Default: 0.01
    pub threshold: f64,

    /// Clamp each updated angle to the joint's rotation limits
    ///
    /// Default: true
    pub clamp_to_limits: bool,

    /// Never update the joint directly before the end-effector
    ///
    /// Default: false
    pub freeze_pre_effector: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            threshold: 0.01,
            clamp_to_limits: true,
            freeze_pre_effector: false,
        }
    }
}

/// Waypoint driver and frame cadence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// World size of one grid cell
    pub cell_size: f64,
    /// Time between waypoint advances
    pub waypoint_interval_ms: u64,
    /// Animation frames per second
    pub frame_rate_hz: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.05,
            waypoint_interval_ms: 500,
            frame_rate_hz: 60,
        }
    }
}

impl DriverConfig {
    /// Animation frames between two waypoint advances, at least one
    pub fn frames_per_waypoint(&self) -> u64 {
        let frames = self
            .waypoint_interval_ms
            .saturating_mul(self.frame_rate_hz as u64)
            / 1000;
        frames.max(1)
    }
}

/// Complete MazeArm configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeArmConfig {
    pub grid: GridConfig,
    pub solver: SolverConfig,
    pub driver: DriverConfig,
}

impl MazeArmConfig {
    /// Load from a `.toml` file, or YAML for any other extension
    pub fn load(path: impl AsRef<Path>) -> MazeArmResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save as YAML or TOML, by extension
    pub fn save(&self, path: impl AsRef<Path>) -> MazeArmResult<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| MazeArmError::Serialization(e.to_string()))?
            }
            _ => serde_yaml::to_string(self).map_err(|e| MazeArmError::Serialization(e.to_string()))?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> MazeArmResult<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(MazeArmError::InvalidDimensions {
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        if self.solver.max_iterations == 0 {
            return Err(MazeArmError::Config(
                "solver.max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.solver.threshold.is_finite() && self.solver.threshold > 0.0) {
            return Err(MazeArmError::Config(format!(
                "solver.threshold must be positive, got {}",
                self.solver.threshold
            )));
        }
        if !(self.driver.cell_size.is_finite() && self.driver.cell_size > 0.0) {
            return Err(MazeArmError::Config(format!(
                "driver.cell_size must be positive, got {}",
                self.driver.cell_size
            )));
        }
        if self.driver.frame_rate_hz == 0 {
            return Err(MazeArmError::Config(
                "driver.frame_rate_hz must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
