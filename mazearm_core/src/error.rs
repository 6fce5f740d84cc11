//! Error types for MazeArm
//!
//! Only construction and configuration problems are errors. An unreachable
//! goal or a target the arm cannot reach are ordinary return values.

use thiserror::Error;

/// MazeArm errors
#[derive(Debug, Error)]
pub enum MazeArmError {
    #[error("Invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Kinematic chain has no joints")]
    EmptyChain,

    #[error("Joint index {index} out of range for chain of {len} joints")]
    JointOutOfRange { index: usize, len: usize },

    #[error("Invalid rotation limits for joint {index}: min {min} > max {max}")]
    InvalidLimits { index: usize, min: f64, max: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MazeArmError {
    fn from(err: serde_json::Error) -> Self {
        MazeArmError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for MazeArmError {
    fn from(err: serde_yaml::Error) -> Self {
        MazeArmError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for MazeArmError {
    fn from(err: toml::de::Error) -> Self {
        MazeArmError::Config(err.to_string())
    }
}

/// Result type for MazeArm operations
pub type MazeArmResult<T> = Result<T, MazeArmError>;
