use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{GroundRule, MotionTuning};
use crate::systems::PairPolicy;

/// Simulation tunables. Values are per tick, not per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Horizontal speed of walking actors.
    pub move_speed: f64,
    /// Launch velocity (negative is up).
    pub jump_impulse: f64,
    pub gravity: f64,
    /// How far past `vec.y` the floor probe reaches.
    pub probe_depth: f64,
    pub pair_policy: PairPolicy,
    pub ground: GroundRule,
}

impl Default for SimConfig {
    fn default() -> Self {
        let tuning = MotionTuning::default();
        Self {
            move_speed: 3.0,
            jump_impulse: tuning.jump_impulse,
            gravity: tuning.gravity,
            probe_depth: 1.0,
            pair_policy: PairPolicy::Forward,
            ground: tuning.ground,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl SimConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("move_speed", self.move_speed),
            ("jump_impulse", self.jump_impulse),
            ("gravity", self.gravity),
            ("probe_depth", self.probe_depth),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if self.move_speed < 0.0 {
            return Err(ConfigError::Invalid("move_speed must not be negative".into()));
        }
        if self.probe_depth <= 0.0 {
            return Err(ConfigError::Invalid("probe_depth must be positive".into()));
        }
        Ok(())
    }

    pub fn tuning(&self) -> MotionTuning {
        MotionTuning {
            jump_impulse: self.jump_impulse,
            gravity: self.gravity,
            ground: self.ground,
        }
    }
}
