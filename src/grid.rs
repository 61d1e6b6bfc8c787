use glam::{ivec2, IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// A fixed-size, dense 2D grid addressed by cell coordinates.
///
/// Positions are signed so that neighbour offsets can be applied freely; anything outside of
/// `0..size` is simply not contained.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid<Cell> {
    size: UVec2,
    #[serde(bound = "Cell: Serialize + for<'ds> Deserialize<'ds>")]
    cells: Vec<Cell>,
}

impl<Cell: Default + Clone> Grid<Cell> {
    pub fn new(size: impl Into<mint::Vector2<u32>>) -> Self {
        let size = UVec2::from(size.into());
        Self {
            size,
            cells: vec![Default::default(); area(size)],
        }
    }
}

/// Number of cells in a grid of the given size.
pub fn area(size: UVec2) -> usize {
    size.x as usize * size.y as usize
}

impl<Cell> Default for Grid<Cell> {
    fn default() -> Self {
        Self {
            size: UVec2::ZERO,
            cells: vec![],
        }
    }
}

impl<Cell> Grid<Cell> {
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn contains(&self, pos: impl Into<mint::Vector2<i32>>) -> bool {
        let mint::Vector2 { x, y } = pos.into();
        x >= 0 && y >= 0 && (x as u32) < self.size.x && (y as u32) < self.size.y
    }

    /// Moves the position to the nearest one contained within the grid.
    pub fn clamp(&self, pos: impl Into<mint::Vector2<i32>>) -> IVec2 {
        assert!(
            self.size.x > 0 && self.size.y > 0,
            "Tried to clamp a position into an empty grid"
        );
        IVec2::from(pos.into()).clamp(IVec2::ZERO, self.size.as_ivec2() - IVec2::ONE)
    }

    pub fn cell(&self, pos: impl Into<mint::Vector2<i32>>) -> Option<&Cell> {
        let pos = pos.into();
        self.contains(pos)
            .then(|| self.cells.get(self.index_of(pos)))
            .flatten()
    }

    pub fn cell_mut(&mut self, pos: impl Into<mint::Vector2<i32>>) -> Option<&mut Cell> {
        let pos = pos.into();
        if self.contains(pos) {
            let idx = self.index_of(pos);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    pub fn set_cell(&mut self, pos: impl Into<mint::Vector2<i32>>, value: Cell) {
        let pos = pos.into();
        assert!(
            self.contains(pos),
            "Tried to set cell ({}, {}) of a {}x{} grid which wasn't contained within",
            pos.x,
            pos.y,
            self.size.x,
            self.size.y
        );
        let idx = self.index_of(pos);
        self.cells[idx] = value;
    }

    pub fn cells(&self) -> impl Iterator<Item = (IVec2, &Cell)> {
        let width = self.size.x.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (ivec2((i as u32 % width) as i32, (i as u32 / width) as i32), cell))
    }

    fn index_of(&self, pos: mint::Vector2<i32>) -> usize {
        (pos.x as u32 + pos.y as u32 * self.size.x) as usize
    }
}
