//! Procedural maze generation for a maze chase game.
//!
//! [`Maze`] carves a spanning tree of passages over a grid, picks where the player starts and
//! where the goal lies, and lays out bounded patrol paths for the monsters. A
//! [`TransitionSequencer`] then decides when the new maze may be shown.

pub mod cell;
pub mod config;
pub mod direction;
pub mod events;
pub mod grid;
pub mod level;
pub mod maze;
pub mod patrol;
pub mod sequencer;
pub mod spawn;

pub use glam;

pub use cell::{Edge, EdgeKind, MazeCell, Walls};
pub use config::{Config, ConfigError};
pub use direction::Direction;
pub use events::{Event, EventBus, EventKind, ListenerId};
pub use level::{LevelPlan, Progression};
pub use maze::{Maze, MazeLayout, MazeParams};
pub use patrol::PatrolPath;
pub use sequencer::{SequencerState, TransitionSequencer};
pub use spawn::{EntityHandle, EntityKind, NoSpawner, Spawner};

pub type Result<T> = anyhow::Result<T>;
