use enum_map::Enum;
use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four sides of a maze cell.
///
/// The declaration order is the canonical slot order used by [`crate::cell::MazeCell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Direction {
    North,
    West,
    South,
    East,
}

impl Direction {
    pub const COUNT: usize = 4;
    pub const ALL: [Direction; Self::COUNT] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::Y,
            Direction::West => IVec2::NEG_X,
            Direction::South => IVec2::NEG_Y,
            Direction::East => IVec2::X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
        }
    }

    /// Yaw, in degrees, of an edge facing this direction.
    pub fn orientation(self) -> f32 {
        match self {
            Direction::North => 0.,
            Direction::West => 90.,
            Direction::South => 180.,
            Direction::East => -90.,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Direction {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }
}

impl From<Direction> for IVec2 {
    fn from(value: Direction) -> Self {
        value.offset()
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::Direction;

    #[test]
    fn opposites_cancel_out() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), glam::IVec2::ZERO);
        }
    }

    #[test]
    fn offsets_are_unit_and_distinct() {
        let offsets: Vec<_> = Direction::ALL.iter().map(|d| d.offset()).collect();
        for (i, a) in offsets.iter().enumerate() {
            assert_eq!(a.x.abs() + a.y.abs(), 1);
            assert!(offsets[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn opposite_orientations_are_half_a_turn_apart() {
        for dir in Direction::ALL {
            let diff = (dir.orientation() - dir.opposite().orientation()).abs();
            assert_eq!(diff, 180.);
        }
    }

    #[test]
    fn random_covers_every_direction() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; Direction::COUNT];
        for _ in 0..200 {
            seen[Direction::random(&mut rng) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
