use std::{
    fs,
    path::{Path, PathBuf},
};

use chkforge_terrain::{
    config::EditorConfig, minimap::Minimap, Catalog, Error, MapContext, Result, TerrainLibrary,
};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

#[derive(Parser, Debug)]
#[command(name = "chkforge-terrain")]
#[command(about = "Terrain brushes for StarCraft maps")]
struct Cli {
    /// JSON editor config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with the tileset .cv5/.vx4/.vr4/.wpe files
    #[arg(short, long)]
    graphics_dir: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tilesets and their brushes
    List,
    /// Write a PNG preview of every brush of every loaded tileset
    Icons {
        #[arg(short, long, default_value = "icons")]
        out: PathBuf,
    },
    /// Create a map filled with one brush and write its minimap
    Paint {
        #[arg(short, long)]
        tileset: Option<usize>,
        /// Brush index, the tileset default when omitted
        #[arg(short, long)]
        brush: Option<usize>,
        /// Chance in percent of painting cluttered variants
        #[arg(short, long, allow_negative_numbers = true)]
        clutter: Option<i32>,
        #[arg(short = 'W', long)]
        width: Option<u32>,
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Random seed (fresh entropy if not specified)
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "minimap.png")]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match EditorConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        },
        None => EditorConfig::default(),
    };

    let level = match cli.verbose {
        0 => LevelFilter::from(config.log_level),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = init_logging(level, config.log_file.as_deref()) {
        eprintln!("{err}");
        std::process::exit(2);
    }

    if let Err(err) = run(cli, config) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = fs::File::create(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_err() {
        eprintln!("logger was already initialized");
    }
    return Ok(());
}

fn run(cli: Cli, mut config: EditorConfig) -> Result<()> {
    if cli.graphics_dir.is_some() {
        config.graphics_dir = cli.graphics_dir;
    }
    let catalog = Catalog::global();
    match cli.command {
        Command::List => list(catalog),
        Command::Icons { out } => {
            let terrain = load_terrain(&config)?;
            export_icons(catalog, &terrain, &out)?;
        }
        Command::Paint {
            tileset,
            brush,
            clutter,
            width,
            height,
            seed,
            out,
        } => {
            config.tileset = tileset.unwrap_or(config.tileset);
            config.brush = brush.or(config.brush);
            config.clutter = clutter.unwrap_or(config.clutter);
            config.width = width.unwrap_or(config.width);
            config.height = height.unwrap_or(config.height);
            config.seed = seed.or(config.seed);
            let terrain = load_terrain(&config)?;
            paint(catalog, terrain, &config, &out)?;
        }
    }
    return Ok(());
}

fn load_terrain(config: &EditorConfig) -> Result<TerrainLibrary> {
    match &config.graphics_dir {
        Some(dir) => TerrainLibrary::load_dir(dir),
        None => {
            log::warn!("no graphics directory given, brushes will pick blindly and render black");
            Ok(TerrainLibrary::new())
        }
    }
}

fn list(catalog: &Catalog) {
    for tileset in catalog.tilesets() {
        println!("{} {}", tileset.id(), tileset.name());
        for (index, brush) in tileset.brushes().iter().enumerate() {
            let marker = if index == tileset.default_brush_index() { "*" } else { " " };
            println!("  {marker}{index:>2}  group {:>2}  {}", brush.group_id(), brush.name());
        }
    }
}

fn export_icons(catalog: &Catalog, terrain: &TerrainLibrary, out: &Path) -> Result<()> {
    fs::create_dir_all(out).map_err(|source| Error::Io {
        path: out.to_path_buf(),
        source,
    })?;
    let mut written = 0;
    for tileset in catalog.tilesets() {
        if terrain.get(tileset.id()).is_none() {
            log::info!("skipping {}, no graphics loaded", tileset.name());
            continue;
        }
        for brush in tileset.brushes() {
            let file = format!(
                "{}_{:02}_{}.png",
                tileset.name().to_lowercase(),
                brush.group_id(),
                brush.name().to_lowercase().replace(' ', "_")
            );
            brush.icon(terrain).save(out.join(file))?;
            written += 1;
        }
    }
    log::info!("wrote {written} icons to {}", out.display());
    return Ok(());
}

fn paint(catalog: &Catalog, terrain: TerrainLibrary, config: &EditorConfig, out: &Path) -> Result<()> {
    let tileset = catalog.from_id(config.tileset as i64)?;
    let brush = config.brush.unwrap_or(tileset.default_brush_index());
    let mut ctx = MapContext::new(catalog, terrain, config.seed);
    ctx.new_map(config.width, config.height, tileset.id(), brush, config.clutter)?;
    let map = ctx.map().ok_or(Error::NoMap)?;
    Minimap::render(map, ctx.terrain()).save(out)?;
    log::info!("wrote {}x{} minimap to {}", map.width(), map.height(), out.display());
    return Ok(());
}
