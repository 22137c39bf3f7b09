//! radiant CLI - batch CSG on .map files
//!
//! Loads a map, selects brushes by their index in file order, runs one
//! editor command and writes the result.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use radiant::{EditorContext, RadiantConfig, SceneGraph};
use radiant_csg::{SplitMode, SubtractStrategy};
use radiant_math::Point3;

#[derive(Parser)]
#[command(name = "radiant")]
#[command(about = "Brush CSG tools for radiant .map files", long_about = None)]
struct Cli {
    /// Editor config (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a .map file
    Info {
        /// Path to the .map file
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Subtract the selected brushes from all others
    Subtract {
        /// Input .map file
        input: PathBuf,
        /// Output .map file
        output: PathBuf,
        /// Brush indices to use as cutters (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<usize>,
        /// Fragmentation strategy (default: from config)
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Merge the selected brushes into one convex brush
    Merge {
        /// Input .map file
        input: PathBuf,
        /// Output .map file
        output: PathBuf,
        /// Brush indices to merge (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<usize>,
    },
    /// Replace the selected brushes by hollow shells
    Hollow {
        /// Input .map file
        input: PathBuf,
        /// Output .map file
        output: PathBuf,
        /// Brush indices to hollow (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<usize>,
        /// Wall thickness (default: grid size)
        #[arg(long)]
        offset: Option<f64>,
    },
    /// Split the selected brushes with a plane
    Split {
        /// Input .map file
        input: PathBuf,
        /// Output .map file
        output: PathBuf,
        /// Brush indices to split (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<usize>,
        /// Three plane points as nine numbers, e.g. "0 0 16 0 64 16 64 0 16"
        #[arg(long)]
        plane: String,
        /// Which side to keep
        #[arg(long, default_value = "both")]
        mode: Mode,
        /// Shader of the cap face (default: from config)
        #[arg(long)]
        shader: Option<String>,
    },
    /// Replace one shader by another
    ReplaceShader {
        /// Input .map file
        input: PathBuf,
        /// Output .map file
        output: PathBuf,
        /// Shader to find
        #[arg(long)]
        find: String,
        /// Shader to put in its place
        #[arg(long)]
        replace: String,
        /// Only touch these brush indices (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// One fragment per cutter face
    Apex,
    /// Peel fragments off plane by plane
    Sweep,
}

impl From<Strategy> for SubtractStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Apex => SubtractStrategy::ApexPyramid,
            Strategy::Sweep => SubtractStrategy::PlaneSweep,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Keep the part in front of the plane
    Front,
    /// Keep the part behind the plane
    Back,
    /// Keep both parts
    Both,
}

impl From<Mode> for SplitMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Front => SplitMode::Front,
            Mode::Back => SplitMode::Back,
            Mode::Both => SplitMode::FrontAndBack,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level)?;

    let config = match &cli.config {
        Some(path) => RadiantConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RadiantConfig::default(),
    };
    let mut ctx = EditorContext::from(&config);

    match cli.command {
        Commands::Info { file, json } => {
            show_info(&file, &ctx, json)?;
        }
        Commands::Subtract {
            input,
            output,
            select,
            strategy,
        } => {
            if let Some(strategy) = strategy {
                ctx.subtract_strategy = strategy.into();
            }
            let mut scene = load_scene(&input, &ctx)?;
            select_indices(&mut scene, &select)?;
            let report = radiant::csg_subtract(&mut scene, &ctx);
            save_scene(&scene, &output)?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Commands::Merge {
            input,
            output,
            select,
        } => {
            let mut scene = load_scene(&input, &ctx)?;
            select_indices(&mut scene, &select)?;
            radiant::csg_merge(&mut scene, &ctx)?;
            save_scene(&scene, &output)?;
        }
        Commands::Hollow {
            input,
            output,
            select,
            offset,
        } => {
            if let Some(offset) = offset {
                if offset.is_nan() || offset <= 0.0 {
                    anyhow::bail!("Offset must be positive, got {}", offset);
                }
                ctx.grid_size = offset;
            }
            let mut scene = load_scene(&input, &ctx)?;
            select_indices(&mut scene, &select)?;
            let report = radiant::csg_make_hollow(&mut scene, &ctx);
            save_scene(&scene, &output)?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Commands::Split {
            input,
            output,
            select,
            plane,
            mode,
            shader,
        } => {
            let points = parse_plane(&plane)?;
            let shader = shader.unwrap_or_else(|| ctx.default_shader.clone());
            let mut scene = load_scene(&input, &ctx)?;
            select_indices(&mut scene, &select)?;
            let report = radiant::split_selected(&mut scene, &ctx, points, &shader, mode.into())?;
            save_scene(&scene, &output)?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Commands::ReplaceShader {
            input,
            output,
            find,
            replace,
            select,
        } => {
            let mut scene = load_scene(&input, &ctx)?;
            select_indices(&mut scene, &select)?;
            let count =
                radiant::find_replace_shader(&mut scene, &ctx, &find, &replace, !select.is_empty())?;
            save_scene(&scene, &output)?;
            println!("Replaced {} faces", count);
        }
    }

    Ok(())
}

fn load_scene(path: &Path, ctx: &EditorContext) -> Result<SceneGraph> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = radiant_map::read_map_with_max_world_coord(&data, ctx.max_world_coord)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(SceneGraph::from_document(&doc, ctx))
}

fn save_scene(scene: &SceneGraph, path: &Path) -> Result<()> {
    radiant_map::write_map(&scene.to_document(), path)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Select brushes by index in file order.
fn select_indices(scene: &mut SceneGraph, indices: &[usize]) -> Result<()> {
    let ids = scene.brush_ids();
    let wanted: BTreeSet<usize> = indices.iter().copied().collect();
    for index in wanted {
        let Some(id) = ids.get(index) else {
            anyhow::bail!("Brush index {} out of range (map has {} brushes)", index, ids.len());
        };
        scene.select(*id, true);
    }
    Ok(())
}

fn parse_plane(text: &str) -> Result<[Point3; 3]> {
    let numbers = text
        .split_whitespace()
        .map(|w| w.parse::<f64>().with_context(|| format!("invalid number: {w}")))
        .collect::<Result<Vec<_>>>()?;
    if numbers.len() != 9 {
        anyhow::bail!("Plane needs 9 numbers, got {}", numbers.len());
    }
    Ok([
        Point3::new(numbers[0], numbers[1], numbers[2]),
        Point3::new(numbers[3], numbers[4], numbers[5]),
        Point3::new(numbers[6], numbers[7], numbers[8]),
    ])
}

#[derive(Serialize)]
struct MapInfo {
    entities: usize,
    brushes: usize,
    faces: usize,
    detail_brushes: usize,
    classnames: Vec<String>,
    shaders: BTreeSet<String>,
    mins: [f64; 3],
    maxs: [f64; 3],
}

fn show_info(path: &Path, ctx: &EditorContext, json: bool) -> Result<()> {
    let scene = load_scene(path, ctx)?;

    let brushes: Vec<_> = scene
        .brush_ids()
        .into_iter()
        .filter_map(|id| scene.brush(id))
        .collect();
    let mut mins = [f64::INFINITY; 3];
    let mut maxs = [f64::NEG_INFINITY; 3];
    for brush in &brushes {
        let aabb = brush.aabb();
        for i in 0..3 {
            mins[i] = mins[i].min(aabb.min[i]);
            maxs[i] = maxs[i].max(aabb.max[i]);
        }
    }

    let info = MapInfo {
        entities: scene.entity_ids().len(),
        brushes: brushes.len(),
        faces: brushes
            .iter()
            .map(|b| b.faces().iter().filter(|f| f.contributes()).count())
            .sum(),
        detail_brushes: brushes.iter().filter(|b| b.is_detail()).count(),
        classnames: scene
            .entity_ids()
            .iter()
            .filter_map(|id| scene.entity(*id))
            .map(|e| e.classname().unwrap_or("<none>").to_string())
            .collect(),
        shaders: brushes
            .iter()
            .flat_map(|b| b.faces())
            .map(|f| f.shader_name().to_string())
            .collect(),
        mins,
        maxs,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Map: {}", path.display());
    println!("Entities: {}", info.entities);
    for (i, name) in info.classnames.iter().enumerate() {
        println!("  {}: {}", i, name);
    }
    println!("Brushes: {} ({} detail)", info.brushes, info.detail_brushes);
    println!("Faces: {}", info.faces);
    if info.brushes > 0 {
        println!(
            "Bounds: ({}, {}, {}) - ({}, {}, {})",
            info.mins[0], info.mins[1], info.mins[2], info.maxs[0], info.maxs[1], info.maxs[2]
        );
    }
    println!("Shaders: {}", info.shaders.len());
    for shader in &info.shaders {
        println!("  {}", radiant_brush::shader_to_map_name(shader));
    }

    Ok(())
}
