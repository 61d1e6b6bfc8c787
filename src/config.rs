use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::level::{scripted_levels, EndlessLevels, LevelPlan};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: f32 },
    #[error("level {index} has a zero-area size")]
    EmptyLevel { index: usize },
    #[error("endless range {name} has its minimum above its maximum")]
    UnorderedRange { name: &'static str },
    #[error("endless levels may be drawn with a zero-area size")]
    EmptyEndlessLevel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum time, in seconds, that a transition stays on screen.
    pub transition_duration: f32,
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Height above the start cell the player is put back at after being caught.
    pub player_spawn_height: f32,
    /// Height above the goal cell of the goal trigger.
    pub goal_height: f32,
    /// Height above the start cell the reaper appears at.
    pub arrival_spawn_height: f32,
    pub levels: Vec<LevelPlan>,
    pub endless: EndlessLevels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transition_duration: 3.,
            cell_size: 500.,
            player_spawn_height: 100.,
            goal_height: 100.,
            arrival_spawn_height: 200.,
            levels: scripted_levels(),
            endless: EndlessLevels::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        for (name, value) in [
            ("transition_duration", self.transition_duration),
            ("player_spawn_height", self.player_spawn_height),
            ("goal_height", self.goal_height),
            ("arrival_spawn_height", self.arrival_spawn_height),
        ] {
            if value < 0. {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }
        for (index, level) in self.levels.iter().enumerate() {
            if let LevelPlan::Maze(params) = level {
                if params.size.x == 0 || params.size.y == 0 {
                    return Err(ConfigError::EmptyLevel { index });
                }
            }
        }
        for (name, span) in self.endless.spans() {
            if !span.is_ordered() {
                return Err(ConfigError::UnorderedRange { name });
            }
        }
        if self.endless.size_x.min == 0 || self.endless.size_y.min == 0 {
            return Err(ConfigError::EmptyEndlessLevel);
        }
        Ok(())
    }
}
