use bitflags::bitflags;
use enum_map::EnumMap;
use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Passage,
    Wall,
}

/// The relationship between a cell and whatever lies in one of its directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Coordinates of the cell owning this edge.
    pub cell: IVec2,
    /// Coordinates of the neighbour, or [`None`] if the edge faces the maze boundary.
    pub other_cell: Option<IVec2>,
    /// Direction of the edge, relative to `cell`.
    pub direction: Direction,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(
        cell: IVec2,
        other_cell: Option<IVec2>,
        direction: Direction,
        kind: EdgeKind,
    ) -> Self {
        Self {
            cell,
            other_cell,
            direction,
            kind,
        }
    }

    /// The same relationship seen from the other cell.
    ///
    /// Boundary edges have no mirror.
    pub fn mirrored(&self) -> Option<Edge> {
        self.other_cell.map(|other| Edge {
            cell: other,
            other_cell: Some(self.cell),
            direction: self.direction.opposite(),
            kind: self.kind,
        })
    }

    pub fn is_passage(&self) -> bool {
        self.kind == EdgeKind::Passage
    }

    pub fn is_wall(&self) -> bool {
        self.kind == EdgeKind::Wall
    }

    /// Yaw, in degrees, that the edge's geometry should be rotated by.
    pub fn orientation(&self) -> f32 {
        self.direction.orientation()
    }
}

bitflags! {
    #[derive(Default)]
    pub struct Walls: u8 {
        const NORTH = 1 << 0;
        const WEST = 1 << 1;
        const SOUTH = 1 << 2;
        const EAST = 1 << 3;
    }
}

impl From<Direction> for Walls {
    fn from(value: Direction) -> Self {
        match value {
            Direction::North => Walls::NORTH,
            Direction::West => Walls::WEST,
            Direction::South => Walls::SOUTH,
            Direction::East => Walls::EAST,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MazeCell {
    coordinates: IVec2,
    edges: EnumMap<Direction, Option<Edge>>,
    initialized_edge_count: usize,
}

impl MazeCell {
    pub fn new(coordinates: IVec2) -> Self {
        Self {
            coordinates,
            edges: EnumMap::default(),
            initialized_edge_count: 0,
        }
    }

    pub fn coordinates(&self) -> IVec2 {
        self.coordinates
    }

    pub fn edge(&self, direction: Direction) -> Option<&Edge> {
        self.edges[direction].as_ref()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().flatten()
    }

    pub fn set_edge(&mut self, direction: Direction, edge: Edge) {
        assert!(
            self.edges[direction].is_none(),
            "Tried to overwrite the {:?} edge of cell {}",
            direction,
            self.coordinates
        );
        self.edges[direction] = Some(edge);
        self.initialized_edge_count += 1;
    }

    pub fn initialized_edge_count(&self) -> usize {
        self.initialized_edge_count
    }

    pub fn is_fully_initialized(&self) -> bool {
        self.initialized_edge_count >= Direction::COUNT
    }

    /// Picks uniformly among the directions that have no edge yet.
    ///
    /// Panics if the cell is fully initialized.
    pub fn random_uninitialized_direction(&self, rng: &mut impl Rng) -> Direction {
        assert!(
            !self.is_fully_initialized(),
            "Cell {} has no uninitialized direction left",
            self.coordinates
        );
        let mut skips = rng.gen_range(0..Direction::COUNT - self.initialized_edge_count);
        for (direction, edge) in self.edges.iter() {
            if edge.is_none() {
                if skips == 0 {
                    return direction;
                }
                skips -= 1;
            }
        }
        unreachable!("initialized edge count of cell {} is out of sync", self.coordinates)
    }

    pub fn passage_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges().filter(|edge| edge.is_passage())
    }

    pub fn walls(&self) -> Walls {
        self.edges()
            .filter(|edge| edge.is_wall())
            .fold(Walls::empty(), |walls, edge| walls | Walls::from(edge.direction))
    }
}
