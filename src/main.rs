use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use image::RgbaImage;
use tacboard::catalog::Catalog;
use tacboard::config::BoardConfig;
use tacboard::engine::{Action, BoardCore};
use tacboard::error::CatalogError;
use tacboard::render::{self, AssetSource};
use tacboard::replay::{self, ReplayError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to write frame: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tacboard", about = "Headless tactical whiteboard")]
struct Cli {
    /// Alternate catalog JSON instead of the built-in table.
    #[arg(long, env = "TACBOARD_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an event script and write the composed board as a PNG.
    Replay {
        script: PathBuf,
        #[arg(long, default_value = "board.png")]
        out: PathBuf,
        #[arg(long, env = "TACBOARD_WIDTH", default_value_t = 900)]
        width: u32,
        #[arg(long, env = "TACBOARD_HEIGHT", default_value_t = 506)]
        height: u32,
        /// Directory that `./img/...` references resolve against.
        #[arg(long, env = "TACBOARD_ASSETS")]
        assets: Option<PathBuf>,
        /// Print every resulting action as a JSON line.
        #[arg(long)]
        actions: bool,
    },
    /// Print the sticker and map catalog.
    Catalog,
    /// List selectable maps and their floors.
    Maps,
}

fn main() -> Result<(), CliError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    run(Cli::parse()).inspect_err(|e| tracing::error!(error = %e, "tacboard failed"))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Replay { script, out, width, height, assets, actions } => {
            let assets = DirAssets::new(assets.unwrap_or_else(|| base_dir(&script)));
            run_replay(catalog, &script, &out, (width, height), &assets, actions)
        }
        Command::Catalog => print_json(&serde_json::to_value(&catalog)?),
        Command::Maps => {
            for map in catalog.selectable_maps() {
                let floors: Vec<&str> = map.floors.iter().map(|f| f.name.as_str()).collect();
                println!("{}\t{}\t{}", map.id, map.name, floors.join(", "));
            }
            Ok(())
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
    Ok(Catalog::from_json(&raw)?)
}

fn run_replay(
    catalog: Catalog,
    script: &Path,
    out: &Path,
    (width, height): (u32, u32),
    assets: &DirAssets,
    print_actions: bool,
) -> Result<(), CliError> {
    let events = replay::load_script(script)?;
    let mut core = BoardCore::new(BoardConfig::from_env(), catalog);
    core.resize(width, height);

    let actions = replay::run_script(&mut core, &events, &base_dir(script))?;
    for action in &actions {
        if let Action::Notice(notice) = action {
            tracing::info!(text = %notice.text, "notice");
        }
        if print_actions {
            println!("{}", serde_json::to_string(action)?);
        }
    }

    let frame = render::compose(&core, assets);
    frame.save(out)?;
    tracing::info!(
        events = events.len(),
        stickers = core.stickers().len(),
        out = %out.display(),
        "frame written"
    );
    Ok(())
}

fn base_dir(script: &Path) -> PathBuf {
    script.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Loads local image references from a directory. Remote URLs are not
/// fetched.
struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl AssetSource for DirAssets {
    fn load(&self, url: &str) -> Option<RgbaImage> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return None;
        }
        let path = self.root.join(url.trim_start_matches("./"));
        match image::open(&path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "asset unavailable");
                None
            }
        }
    }
}
