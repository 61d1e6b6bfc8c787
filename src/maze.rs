use glam::{ivec2, IVec2, UVec2, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    cell::{Edge, EdgeKind, MazeCell},
    config::Config,
    direction::Direction,
    events::{Event, EventBus},
    grid::{self, Grid},
    patrol::{derive_patrol_path, PatrolPath},
    sequencer::TransitionSequencer,
    spawn::{EntityKind, Spawner},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeParams {
    pub size: UVec2,
    pub monster_count: u32,
    /// Number of cells each monster should include in its patrol.
    pub patrol_length: u32,
    /// Seconds until the reaper arrives once the maze is shown. Zero means it never does.
    #[serde(default)]
    pub arrival_timer: u32,
}

impl MazeParams {
    pub const fn new(size_x: u32, size_y: u32, monster_count: u32, patrol_length: u32) -> Self {
        Self {
            size: UVec2::new(size_x, size_y),
            monster_count,
            patrol_length,
            arrival_timer: 0,
        }
    }

    pub const fn with_arrival_timer(mut self, arrival_timer: u32) -> Self {
        self.arrival_timer = arrival_timer;
        self
    }
}

/// Serializable summary of a generated maze.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub size: UVec2,
    pub start: IVec2,
    pub goal: IVec2,
    /// Home and target of each patrol.
    pub patrols: Vec<[IVec2; 2]>,
    pub cells: Vec<CellLayout>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub coordinates: IVec2,
    /// Bits of [`crate::cell::Walls`].
    pub walls: u8,
}

/// Where entities go relative to the cells, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Placement {
    cell_size: f32,
    player_spawn_height: f32,
    goal_height: f32,
    arrival_spawn_height: f32,
}

pub struct Maze {
    params: MazeParams,
    cells: Grid<Option<MazeCell>>,
    /// Cells that monster patrols may not go through.
    used: Grid<bool>,
    start: IVec2,
    goal: IVec2,
    patrols: Vec<PatrolPath>,
    generation_finished: bool,
    is_finale: bool,
    placement: Placement,
    sequencer: TransitionSequencer,
    events: EventBus,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Maze {
    pub fn new(config: &Config) -> Self {
        Self {
            params: MazeParams::new(0, 0, 0, 0),
            cells: Grid::default(),
            used: Grid::default(),
            start: IVec2::ZERO,
            goal: IVec2::ZERO,
            patrols: vec![],
            generation_finished: false,
            is_finale: false,
            placement: Placement {
                cell_size: config.cell_size,
                player_spawn_height: config.player_spawn_height,
                goal_height: config.goal_height,
                arrival_spawn_height: config.arrival_spawn_height,
            },
            sequencer: TransitionSequencer::new(config.transition_duration),
            events: EventBus::new(),
        }
    }

    /// Generates a new maze, replacing the previous one, then picks the start, the goal and the
    /// monster patrols.
    ///
    /// Panics if the requested size has no area.
    pub fn generate(&mut self, params: MazeParams, rng: &mut impl Rng) {
        assert!(
            params.size.x > 0 && params.size.y > 0,
            "Tried to generate a {}x{} maze",
            params.size.x,
            params.size.y
        );
        self.sequencer.arm();
        self.clear();
        self.params = params;
        self.cells = Grid::new(params.size);
        self.used = Grid::new(params.size);

        let mut active_cells = Vec::with_capacity(grid::area(params.size));
        self.do_first_generation_step(&mut active_cells, rng);
        while !active_cells.is_empty() {
            self.do_next_generation_step(&mut active_cells, rng);
        }

        let size = params.size.as_ivec2();
        self.start = ivec2(0, rng.gen_range(0..size.y));
        self.used.set_cell(self.start, true);
        log::info!("Start is {} at {}", self.start, self.start_location());

        self.goal = ivec2(size.x - 1, rng.gen_range(0..size.y));
        self.used.set_cell(self.goal, true);
        log::info!("Goal is {} at {}", self.goal, self.goal_location());

        for monster in 0..params.monster_count {
            match derive_patrol_path(
                &self.cells,
                &mut self.used,
                params.patrol_length as usize,
                rng,
            ) {
                Some(path) => self.patrols.push(path),
                None => log::warn!("No unused cell left for the patrol of monster {monster}"),
            }
        }

        self.generation_finished = true;
        self.sequencer
            .finish_generation((params.arrival_timer != 0).then_some(params.arrival_timer));
    }

    /// Sets up the finale, which has no maze: the level's own geometry holds the goal.
    pub fn generate_last_level(&mut self) {
        self.sequencer.arm();
        self.clear();
        self.is_finale = true;
        self.generation_finished = true;
        self.sequencer.finish_generation(None);
    }

    /// Throws away the current maze. Entities spawned for it are the host's responsibility.
    pub fn clear(&mut self) {
        self.params = MazeParams::new(0, 0, 0, 0);
        self.cells = Grid::default();
        self.used = Grid::default();
        self.start = IVec2::ZERO;
        self.goal = IVec2::ZERO;
        self.patrols.clear();
        self.generation_finished = false;
        self.is_finale = false;
    }

    fn do_first_generation_step(&mut self, active_cells: &mut Vec<IVec2>, rng: &mut impl Rng) {
        let coordinates = self.random_coordinates(rng);
        self.create_cell(coordinates);
        active_cells.push(coordinates);
    }

    /// Grows the maze from the most recently added active cell, backtracking once it has no
    /// uninitialized direction left.
    fn do_next_generation_step(&mut self, active_cells: &mut Vec<IVec2>, rng: &mut impl Rng) {
        let current = active_cells[active_cells.len() - 1];
        let cell = self
            .cell(current)
            .expect("active cells always exist in the grid");
        if cell.is_fully_initialized() {
            active_cells.pop();
            return;
        }

        let direction = cell.random_uninitialized_direction(rng);
        let coordinates = current + direction.offset();
        if self.contains_coordinates(coordinates) {
            if self.cell(coordinates).is_none() {
                self.create_cell(coordinates);
                self.create_passage(current, coordinates, direction);
                active_cells.push(coordinates);
            } else {
                self.create_wall(current, Some(coordinates), direction);
            }
        } else {
            self.create_wall(current, None, direction);
        }
    }

    fn create_cell(&mut self, coordinates: IVec2) {
        self.cells
            .set_cell(coordinates, Some(MazeCell::new(coordinates)));
    }

    fn create_passage(&mut self, cell: IVec2, other_cell: IVec2, direction: Direction) {
        let edge = Edge::new(cell, Some(other_cell), direction, EdgeKind::Passage);
        self.install_edge(edge);
        self.install_edge(edge.mirrored().expect("passages always link two cells"));
    }

    fn create_wall(&mut self, cell: IVec2, other_cell: Option<IVec2>, direction: Direction) {
        let edge = Edge::new(cell, other_cell, direction, EdgeKind::Wall);
        self.install_edge(edge);
        if let Some(mirrored) = edge.mirrored() {
            self.install_edge(mirrored);
        }
    }

    fn install_edge(&mut self, edge: Edge) {
        self.cells
            .cell_mut(edge.cell)
            .and_then(Option::as_mut)
            .expect("edges are only created between existing cells")
            .set_edge(edge.direction, edge);
    }

    pub fn random_coordinates(&self, rng: &mut impl Rng) -> IVec2 {
        let size = self.size().as_ivec2();
        ivec2(rng.gen_range(0..size.x), rng.gen_range(0..size.y))
    }

    pub fn contains_coordinates(&self, coordinates: IVec2) -> bool {
        self.cells.contains(coordinates)
    }

    /// Returns [`None`] outside of the maze, or where no cell has been generated yet.
    pub fn cell(&self, coordinates: IVec2) -> Option<&MazeCell> {
        self.cells.cell(coordinates).and_then(Option::as_ref)
    }

    pub fn cells(&self) -> impl Iterator<Item = &MazeCell> {
        self.cells.cells().filter_map(|(_, cell)| cell.as_ref())
    }

    pub fn is_cell_used(&self, coordinates: IVec2) -> bool {
        self.used.cell(coordinates).copied().unwrap_or(false)
    }

    pub fn size(&self) -> UVec2 {
        self.cells.size()
    }

    pub fn params(&self) -> &MazeParams {
        &self.params
    }

    pub fn is_generation_finished(&self) -> bool {
        self.generation_finished
    }

    pub fn is_finale(&self) -> bool {
        self.is_finale
    }

    /// World location of the center of a cell. The maze is centered on the origin.
    pub fn cell_location(&self, coordinates: IVec2) -> Vec3 {
        let size = self.size().as_vec2();
        ((coordinates.as_vec2() - size * 0.5 + Vec2::splat(0.5)) * self.placement.cell_size)
            .extend(0.)
    }

    pub fn start_coordinates(&self) -> IVec2 {
        self.start
    }

    pub fn goal_coordinates(&self) -> IVec2 {
        self.goal
    }

    /// In the finale, the player starts at the origin.
    pub fn start_location(&self) -> Vec3 {
        if self.is_finale {
            Vec3::ZERO
        } else {
            self.cell_location(self.start)
        }
    }

    /// In the finale, the goal is defined by the level's geometry and this returns the origin.
    pub fn goal_location(&self) -> Vec3 {
        if self.is_finale {
            Vec3::ZERO
        } else {
            self.cell_location(self.goal)
        }
    }

    pub fn patrol_count(&self) -> usize {
        self.patrols.len()
    }

    pub fn patrol(&self, index: usize) -> Option<&PatrolPath> {
        self.patrols.get(index)
    }

    /// Home and target locations of a monster's patrol.
    pub fn patrol_path(&self, index: usize) -> Option<(Vec3, Vec3)> {
        self.patrol(index)
            .map(|path| (self.cell_location(path.home()), self.cell_location(path.target())))
    }

    /// Spawns the player, the goal trigger and every monster of the current maze.
    pub fn spawn_entities(&self, spawner: &mut impl Spawner) {
        spawner.spawn(EntityKind::Player, self.start_location());
        if !self.is_finale {
            spawner.spawn(
                EntityKind::Goal,
                self.goal_location() + Vec3::Z * self.placement.goal_height,
            );
        }
        for index in 0..self.patrols.len() {
            if let Some((home, _)) = self.patrol_path(index) {
                spawner.spawn(EntityKind::Monster, home);
            }
        }
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn sequencer(&self) -> &TransitionSequencer {
        &self.sequencer
    }

    /// Advances the transition countdowns, publishing whatever fired. The reaper is spawned
    /// through `spawner` when it arrives.
    pub fn tick(&mut self, dt: f32, spawner: &mut impl Spawner) -> Vec<Event> {
        let events = self.sequencer.tick(dt);
        for event in &events {
            if *event == Event::Arrival {
                spawner.spawn(
                    EntityKind::Reaper,
                    self.start_location() + Vec3::Z * self.placement.arrival_spawn_height,
                );
            }
            self.events.publish(event);
        }
        events
    }

    /// Signals that the player was caught by a monster.
    pub fn respawn_character(&mut self) {
        self.events.publish(&Event::MonsterKill);
    }

    /// Returns where the player should be moved back to, and signals it.
    pub fn reset_character_location(&mut self) -> Vec3 {
        let location = self.start_location() + Vec3::Z * self.placement.player_spawn_height;
        self.events.publish(&Event::LocationReset(location));
        location
    }

    pub fn layout(&self) -> MazeLayout {
        MazeLayout {
            size: self.size(),
            start: self.start,
            goal: self.goal,
            patrols: self
                .patrols
                .iter()
                .map(|path| [path.home(), path.target()])
                .collect(),
            cells: self
                .cells()
                .map(|cell| CellLayout {
                    coordinates: cell.coordinates(),
                    walls: cell.walls().bits(),
                })
                .collect(),
        }
    }
}
