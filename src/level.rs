use glam::uvec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::maze::MazeParams;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelPlan {
    Maze(MazeParams),
    /// The hand-made last level, without any maze.
    Finale,
}

/// An inclusive range of values to draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Parameters of the randomized levels played after the scripted ones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndlessLevels {
    pub size_x: Span,
    pub size_y: Span,
    pub monster_count: Span,
    pub patrol_length: Span,
    pub arrival_timer: Span,
}

impl Default for EndlessLevels {
    fn default() -> Self {
        Self {
            size_x: Span::new(10, 30),
            size_y: Span::new(10, 30),
            monster_count: Span::new(10, 30),
            patrol_length: Span::new(10, 30),
            arrival_timer: Span::new(60, 240),
        }
    }
}

impl EndlessLevels {
    pub fn sample(&self, rng: &mut impl Rng) -> MazeParams {
        MazeParams {
            size: uvec2(self.size_x.sample(rng), self.size_y.sample(rng)),
            monster_count: self.monster_count.sample(rng),
            patrol_length: self.patrol_length.sample(rng),
            arrival_timer: self.arrival_timer.sample(rng),
        }
    }

    pub fn spans(&self) -> [(&'static str, Span); 5] {
        [
            ("size_x", self.size_x),
            ("size_y", self.size_y),
            ("monster_count", self.monster_count),
            ("patrol_length", self.patrol_length),
            ("arrival_timer", self.arrival_timer),
        ]
    }
}

/// The levels played in order before the endless ones.
pub fn scripted_levels() -> Vec<LevelPlan> {
    vec![
        LevelPlan::Maze(MazeParams::new(4, 4, 0, 0)),
        LevelPlan::Maze(MazeParams::new(7, 7, 0, 0)),
        LevelPlan::Maze(MazeParams::new(20, 1, 1, 10)),
        LevelPlan::Maze(MazeParams::new(8, 8, 2, 15)),
        LevelPlan::Maze(MazeParams::new(10, 10, 5, 15).with_arrival_timer(100)),
        LevelPlan::Maze(MazeParams::new(15, 15, 8, 20).with_arrival_timer(300)),
        LevelPlan::Finale,
    ]
}

/// Keeps track of which level the player is at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progression {
    index: usize,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the level [`Progression::next_level`] will return.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next_level(
        &mut self,
        levels: &[LevelPlan],
        endless: &EndlessLevels,
        rng: &mut impl Rng,
    ) -> LevelPlan {
        let plan = match levels.get(self.index) {
            Some(&plan) => plan,
            None => LevelPlan::Maze(endless.sample(rng)),
        };
        self.index += 1;
        plan
    }

    /// Makes the next call to [`Progression::next_level`] replay the last level.
    pub fn retry(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}
