//! Yard Planner CLI
//!
//! Usage:
//!   yard-planner [OPTIONS] <COMMAND>
//!
//! Options:
//!   --state <FILE>   Storage file holding yards and preferences (default: yards.json)
//!   --config <FILE>  Editor configuration (TOML format)
//!   --no-snap        Place without grid snapping or collision repair
//!   -v, --verbose    Log placement decisions
//!   -h, --help       Print help

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use yard_planner::report::{billing_total, format_usd, render_occupant_table, yard_summary};
use yard_planner::{
    open_editor, save_editor, upgrade_yards, EditorConfig, EditorError, EditorState, FileStorage,
    Movement, Nudge, Point, StorageError, Unit, Yard,
};

#[derive(Parser)]
#[command(name = "yard-planner")]
#[command(about = "Lay out containers on a storage yard")]
struct Cli {
    /// Storage file holding yards and preferences
    #[arg(long, default_value = "yards.json")]
    state: PathBuf,

    /// Editor configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable grid snapping; blocked placements fail instead of relocating
    #[arg(long)]
    no_snap: bool,

    /// Log placement decisions (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Ft,
    M,
    Cm,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Ft => Unit::Ft,
            UnitArg::M => Unit::M,
            UnitArg::Cm => Unit::Cm,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for Nudge {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Nudge::Up,
            DirectionArg::Down => Nudge::Down,
            DirectionArg::Left => Nudge::Left,
            DirectionArg::Right => Nudge::Right,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List yards; the open one is marked with '*'
    List,
    /// Create a yard and open it
    NewYard {
        name: String,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long, value_enum, default_value = "ft")]
        unit: UnitArg,
    },
    /// Open another yard
    Open { yard: String },
    /// Add a layer to the open yard and make it active
    AddLayer {
        #[arg(default_value = "")]
        name: String,
    },
    /// Place a container of the given type on the active layer
    Place {
        /// Container type key, e.g. 20ft
        kind: String,
        x: f64,
        y: f64,
        /// Treat (x, y) as the container's centre, like a palette drop
        #[arg(long)]
        center: bool,
    },
    /// Move a container to an absolute position
    Move { container: String, x: f64, y: f64 },
    /// Move a container one grid cell
    Nudge {
        container: String,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Toggle a container between 0 and 90 degrees
    Rotate { container: String },
    /// Delete a container
    Remove { container: String },
    /// Print the occupant table of the open yard
    Report,
    /// Upgrade a raw yard collection from any earlier format and print it
    Upgrade {
        input: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), EditorError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Upgrade { input, output } => {
            let content = fs::read_to_string(input).map_err(StorageError::from)?;
            let raw: serde_json::Value = serde_json::from_str(&content)?;
            let yards = upgrade_yards(&raw, &config.container_types);
            let text = serde_json::to_string_pretty(&yards)?;
            match output {
                Some(path) => fs::write(path, text).map_err(StorageError::from)?,
                None => println!("{}", text),
            }
            return Ok(());
        }
        _ => {}
    }

    let mut storage = FileStorage::new(&cli.state);
    let mut state = open_editor(&storage, config)?;
    if cli.no_snap {
        state.snap_enabled = false;
    }

    let changed = execute(&mut state, cli.command)?;
    if changed {
        save_editor(&mut storage, &state)?;
    }
    Ok(())
}

/// Run one command; returns whether the state needs saving
fn execute(state: &mut EditorState, command: Command) -> Result<bool, EditorError> {
    let options = state.placement_options();
    match command {
        Command::List => {
            let active = state.book.active_yard_id().map(str::to_string);
            for yard in state.book.yards() {
                let marker = if Some(&yard.id) == active.as_ref() { "*" } else { " " };
                println!("{} {}  {}", marker, yard.id, yard_summary(yard));
            }
            Ok(false)
        }
        Command::NewYard {
            name,
            width,
            height,
            unit,
        } => {
            let catalog = state.config.container_types.clone();
            let id = state
                .book
                .create_yard(&name, width, height, unit.into(), &catalog)?;
            println!("{}", id);
            Ok(true)
        }
        Command::Open { yard } => {
            state.open_yard(&yard)?;
            Ok(true)
        }
        Command::AddLayer { name } => {
            let id = active_yard(state)?.add_layer(&name);
            println!("{}", id);
            Ok(true)
        }
        Command::Place { kind, x, y, center } => {
            let kind = state
                .config
                .container_type(&kind)
                .cloned()
                .ok_or_else(|| EditorError::not_found("container type", kind))?;
            let yard = active_yard(state)?;
            let layer = yard.active_layer_id.clone();
            let pointer = Point::new(x, y);
            let placed = if center {
                yard.drop_new_container(&kind, &layer, pointer, options)?
            } else {
                yard.place_new_container(&kind, &layer, pointer, options)?
            };
            println!("{} '{}' at ({}, {})", placed.id, placed.label, placed.x, placed.y);
            Ok(true)
        }
        Command::Move { container, x, y } => {
            let yard = active_yard(state)?;
            let layer = layer_of(yard, &container)?;
            let at = yard.move_container(&layer, &container, Movement::To(Point::new(x, y)), options)?;
            println!("moved to ({}, {})", at.x, at.y);
            Ok(true)
        }
        Command::Nudge {
            container,
            direction,
        } => {
            let yard = active_yard(state)?;
            let layer = layer_of(yard, &container)?;
            let at = yard.nudge_container(&layer, &container, direction.into())?;
            println!("moved to ({}, {})", at.x, at.y);
            Ok(true)
        }
        Command::Rotate { container } => {
            let yard = active_yard(state)?;
            let layer = layer_of(yard, &container)?;
            let rotation = yard.rotate_container(&layer, &container, options)?;
            println!("rotated to {}°", rotation.degrees());
            Ok(true)
        }
        Command::Remove { container } => {
            let yard = active_yard(state)?;
            let layer = layer_of(yard, &container)?;
            let removed = yard.remove_container(&layer, &container)?;
            println!("removed '{}'", removed.label);
            Ok(true)
        }
        Command::Report => {
            let yard = state
                .book
                .active_yard()
                .ok_or_else(|| EditorError::not_found("yard", "<active>"))?;
            println!("{}", yard_summary(yard));
            print!("{}", render_occupant_table(yard));
            println!("Monthly billing: {}", format_usd(billing_total(yard)));
            Ok(false)
        }
        Command::Upgrade { .. } | Command::Config => Ok(false),
    }
}

fn active_yard(state: &mut EditorState) -> Result<&mut Yard, EditorError> {
    state
        .book
        .active_yard_mut()
        .ok_or_else(|| EditorError::not_found("yard", "<active>"))
}

fn layer_of(yard: &Yard, container_id: &str) -> Result<String, EditorError> {
    yard.locate(container_id)
        .map(|location| yard.layers[location.layer].id.clone())
        .ok_or_else(|| EditorError::not_found("container", container_id))
}
