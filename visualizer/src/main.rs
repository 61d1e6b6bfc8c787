//! Generates a maze and prints it to the terminal.

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use amaze::{
    glam::{ivec2, IVec2, Vec3},
    Config, EntityHandle, EntityKind, Event, EventKind, LevelPlan, Maze, MazeParams, Progression,
    Walls,
};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

/// Maze generation & transition visualization tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of columns
    #[arg(long, default_value_t = 10)]
    width: u32,

    /// Number of rows
    #[arg(long, default_value_t = 10)]
    height: u32,

    /// Number of monster patrols
    #[arg(long, default_value_t = 0)]
    monsters: u32,

    /// Cells per patrol
    #[arg(long, default_value_t = 0)]
    patrol_length: u32,

    /// Seconds until the reaper arrives, 0 to disable
    #[arg(long, default_value_t = 0)]
    arrival_timer: u32,

    /// Play the N-th level of the configured progression instead of the size given above
    #[arg(long, value_name = "N", conflicts_with_all = ["width", "height", "monsters", "patrol_length", "arrival_timer"])]
    level: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the maze layout as JSON instead of drawing it
    #[arg(long)]
    json: bool,

    /// Tick the transition sequencer until everything has fired, printing each event
    #[arg(long)]
    simulate: bool,
}

const TICK: f32 = 1. / 60.;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let plan = match args.level {
        Some(level) => {
            let mut progression = Progression::new();
            let mut plan = progression.next_level(&config.levels, &config.endless, &mut rng);
            while progression.index() <= level {
                plan = progression.next_level(&config.levels, &config.endless, &mut rng);
            }
            plan
        }
        None => LevelPlan::Maze(
            MazeParams::new(args.width, args.height, args.monsters, args.patrol_length)
                .with_arrival_timer(args.arrival_timer),
        ),
    };

    let mut maze = Maze::new(&config);
    let received = Rc::new(RefCell::new(Vec::<Event>::new()));
    for kind in [
        EventKind::TransitionReady,
        EventKind::ArrivalCountdownStarted,
        EventKind::Arrival,
    ] {
        let sink = received.clone();
        maze.events_mut()
            .subscribe(kind, move |event| sink.borrow_mut().push(*event));
    }

    let arrival_timer = match plan {
        LevelPlan::Maze(params) => {
            anyhow::ensure!(
                params.size.x > 0 && params.size.y > 0,
                "mazes need at least one row and one column"
            );
            let start = std::time::Instant::now();
            maze.generate(params, &mut rng);
            let end = std::time::Instant::now();
            log::info!(
                "Generated a {}x{} maze in {:.3}s",
                params.size.x,
                params.size.y,
                (end - start).as_secs_f32()
            );
            params.arrival_timer
        }
        LevelPlan::Finale => {
            maze.generate_last_level();
            0
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&maze.layout())?);
    } else if maze.is_finale() {
        println!("Finale: no maze to draw");
    } else {
        print!("{}", draw(&maze));
    }

    if args.simulate {
        simulate(&mut maze, &received, config.transition_duration + arrival_timer as f32);
    }

    Ok(())
}

fn simulate(maze: &mut Maze, received: &Rc<RefCell<Vec<Event>>>, expected_duration: f32) {
    let mut spawner = |kind: EntityKind, location: Vec3| {
        println!("  spawned {kind:?} at {location}");
        EntityHandle(0)
    };
    maze.spawn_entities(&mut spawner);

    let mut time = 0.;
    // Leave some slack for the last events to fire
    let max_time = expected_duration + 1.;
    while time < max_time {
        maze.tick(TICK, &mut spawner);
        time += TICK;
        for event in received.borrow_mut().drain(..) {
            println!("{time:>7.2}s {event:?}");
        }
        if !maze.sequencer().is_armed() && !maze.sequencer().is_arrival_counting_down() {
            log::info!("Sequencer went idle after {time:.2}s");
            break;
        }
    }
}

fn draw(maze: &Maze) -> String {
    let size = maze.size().as_ivec2();
    let walls = |pos: IVec2| {
        maze.cell(pos)
            .map(|cell| cell.walls())
            .unwrap_or_else(Walls::all)
    };
    let marker = |pos: IVec2| -> String {
        if pos == maze.start_coordinates() {
            return "S ".to_owned();
        }
        if pos == maze.goal_coordinates() {
            return " G".to_owned();
        }
        for index in 0..maze.patrol_count() {
            let Some(path) = maze.patrol(index) else { continue };
            if pos == path.home() {
                return format!("{}h", index % 10);
            }
            if pos == path.target() {
                return format!("{}t", index % 10);
            }
            if path.cells().contains(&pos) {
                return " .".to_owned();
            }
        }
        "  ".to_owned()
    };

    let mut out = String::new();
    // North is +Y, so the top row is drawn first
    for y in (0..size.y).rev() {
        for x in 0..size.x {
            out.push('+');
            out.push_str(if walls(ivec2(x, y)).contains(Walls::NORTH) {
                "--"
            } else {
                "  "
            });
        }
        out.push_str("+\n");
        for x in 0..size.x {
            let pos = ivec2(x, y);
            out.push(if walls(pos).contains(Walls::WEST) { '|' } else { ' ' });
            out.push_str(&marker(pos));
        }
        out.push(if walls(ivec2(size.x - 1, y)).contains(Walls::EAST) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }
    for x in 0..size.x {
        out.push('+');
        out.push_str(if walls(ivec2(x, 0)).contains(Walls::SOUTH) {
            "--"
        } else {
            "  "
        });
    }
    out.push_str("+\n");
    out
}
