use glam::IVec2;
use rand::{
    seq::{IteratorRandom, SliceRandom},
    Rng,
};

use crate::{cell::MazeCell, grid::Grid};

/// Cells walked by a roaming agent, starting at its home.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatrolPath {
    cells: Vec<IVec2>,
}

impl PatrolPath {
    pub fn home(&self) -> IVec2 {
        self.cells[0]
    }

    pub fn target(&self) -> IVec2 {
        *self.cells.last().expect("patrol paths are never empty")
    }

    pub fn cells(&self) -> &[IVec2] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Walks at most `length` cells through passages, never stepping into a used cell.
///
/// Every cell of the path is marked as used. The walk stops early when it reaches a dead end, so
/// the path may be shorter than requested. Returns [`None`] if there is no unused cell to start
/// from.
pub fn derive_patrol_path(
    cells: &Grid<Option<MazeCell>>,
    used: &mut Grid<bool>,
    length: usize,
    rng: &mut impl Rng,
) -> Option<PatrolPath> {
    let home = used
        .cells()
        .filter_map(|(pos, &is_used)| (!is_used).then_some(pos))
        .choose(rng)?;
    used.set_cell(home, true);

    let mut path = vec![home];
    while path.len() < length {
        match random_usable_neighbor(cells, used, path[path.len() - 1], rng) {
            Some(next) => {
                used.set_cell(next, true);
                path.push(next);
            }
            None => {
                log::debug!(
                    "Patrol path from {} stopped at {} of {} cells",
                    home,
                    path.len(),
                    length
                );
                break;
            }
        }
    }

    Some(PatrolPath { cells: path })
}

fn random_usable_neighbor(
    cells: &Grid<Option<MazeCell>>,
    used: &Grid<bool>,
    pos: IVec2,
    rng: &mut impl Rng,
) -> Option<IVec2> {
    let cell = cells
        .cell(pos)
        .and_then(Option::as_ref)
        .expect("patrol paths only walk through generated cells");
    let candidates: Vec<IVec2> = cell
        .passage_edges()
        .map(|edge| used.clamp(pos + edge.direction.offset()))
        .filter(|&neighbor| used.cell(neighbor) == Some(&false))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod test {
    use glam::{ivec2, uvec2, IVec2};
    use rand::{rngs::StdRng, SeedableRng};

    use super::derive_patrol_path;
    use crate::{
        cell::{Edge, EdgeKind, MazeCell},
        direction::Direction,
        grid::Grid,
    };

    /// A 1-wide corridor along X, fully connected with passages.
    fn corridor(len: u32) -> Grid<Option<MazeCell>> {
        let mut grid = Grid::new(uvec2(len, 1));
        for x in 0..len as i32 {
            let pos = ivec2(x, 0);
            let mut cell = MazeCell::new(pos);
            for dir in Direction::ALL {
                let neighbor = pos + dir.offset();
                let edge = if grid.contains(neighbor) {
                    Edge::new(pos, Some(neighbor), dir, EdgeKind::Passage)
                } else {
                    Edge::new(pos, None, dir, EdgeKind::Wall)
                };
                cell.set_edge(dir, edge);
            }
            grid.set_cell(pos, Some(cell));
        }
        grid
    }

    fn is_step(a: IVec2, b: IVec2) -> bool {
        let d = (a - b).abs();
        d.x + d.y == 1
    }

    #[test]
    fn walks_through_passages() {
        let cells = corridor(10);
        let mut used = Grid::new(uvec2(10, 1));
        let mut rng = StdRng::seed_from_u64(1);
        let path = derive_patrol_path(&cells, &mut used, 4, &mut rng).unwrap();
        assert!((1..=4).contains(&path.len()));
        for pair in path.cells().windows(2) {
            assert!(is_step(pair[0], pair[1]));
        }
        for &pos in path.cells() {
            assert_eq!(used.cell(pos), Some(&true));
        }
        assert_eq!(used.cells().filter(|&(_, &u)| u).count(), path.len());
    }

    #[test]
    fn stops_at_used_cells() {
        let cells = corridor(5);
        let mut used = Grid::new(uvec2(5, 1));
        for x in [0, 1, 3, 4] {
            used.set_cell(ivec2(x, 0), true);
        }
        let mut rng = StdRng::seed_from_u64(8);
        let path = derive_patrol_path(&cells, &mut used, 10, &mut rng).unwrap();
        assert_eq!(path.cells(), &[ivec2(2, 0)]);
        assert_eq!(path.home(), path.target());
    }

    #[test]
    fn requested_length_zero_still_has_a_home() {
        let cells = corridor(3);
        let mut used = Grid::new(uvec2(3, 1));
        let mut rng = StdRng::seed_from_u64(2);
        let path = derive_patrol_path(&cells, &mut used, 0, &mut rng).unwrap();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn nothing_left_to_use() {
        let cells = corridor(2);
        let mut used = Grid::new(uvec2(2, 1));
        used.set_cell(ivec2(0, 0), true);
        used.set_cell(ivec2(1, 0), true);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(derive_patrol_path(&cells, &mut used, 3, &mut rng).is_none());
    }

    #[test]
    fn consecutive_paths_never_overlap() {
        let cells = corridor(30);
        let mut used = Grid::new(uvec2(30, 1));
        let mut rng = StdRng::seed_from_u64(42);
        let mut taken = vec![];
        for _ in 0..5 {
            let path = derive_patrol_path(&cells, &mut used, 6, &mut rng).unwrap();
            for pos in path.cells() {
                assert!(!taken.contains(pos));
                taken.push(*pos);
            }
        }
    }
}
