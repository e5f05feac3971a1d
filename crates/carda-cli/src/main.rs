mod project_tools;
mod render_tools;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carda_core::{CardaConfig, Notice, CONFIG_FILE_NAME};
use carda_ir::project::suggested_file_name;
use carda_ir::{AspectRatio, ProjectSnapshot};
use carda_render::assets::system_font_dirs;
use carda_render::AssetRegistry;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "carda",
    version,
    about = "Carda: layered player-card composer",
    long_about = "Carda composes player cards from layered project files.\nBackgrounds, images, styled text and frames, rendered to PNG at any size."
)]
struct Cli {
    /// Configuration file (default: ./carda.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AddKind {
    Text,
    Frame,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project holding only the default background
    New {
        /// Project file to write (default: carda-project-<date>.json)
        #[arg()]
        file: Option<PathBuf>,

        /// Canvas aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4, 3:2, 2:3)
        #[arg(long, default_value = "1:1", value_parser = parse_ratio)]
        ratio: AspectRatio,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load a project and report structural problems
    Check {
        #[arg()]
        file: PathBuf,
    },

    /// Print where every layer lands on the canvas
    Inspect {
        #[arg()]
        file: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export a project to PNG
    Render {
        #[arg()]
        file: PathBuf,

        /// Output file name (default: player-card.png)
        #[arg(short, long)]
        output: Option<String>,

        /// Pixel ratio override (default from config, 2)
        #[arg(long)]
        pixel_ratio: Option<f64>,
    },

    /// Render the interactive preview for a container size
    Preview {
        #[arg()]
        file: PathBuf,

        /// Container width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,

        /// Container height in pixels
        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Layer id to show as selected
        #[arg(long)]
        select: Option<String>,

        /// Output PNG path
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Import an image file as a new layer
    ImportImage {
        /// Project file to update
        #[arg()]
        file: PathBuf,

        /// Image files to import, one layer each
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Change the canvas aspect ratio
    Ratio {
        #[arg()]
        file: PathBuf,

        #[arg(value_parser = parse_ratio)]
        ratio: AspectRatio,
    },

    /// Add a default text or frame layer
    Add {
        #[arg()]
        file: PathBuf,

        #[arg(value_enum)]
        kind: AddKind,

        /// Content for a text layer
        #[arg(long)]
        text: Option<String>,
    },

    /// List text effect presets
    Presets {
        #[arg(long)]
        json: bool,
    },

    /// List font families available to text layers
    Fonts,
}

fn parse_ratio(s: &str) -> std::result::Result<AspectRatio, String> {
    s.parse::<AspectRatio>().map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New { file, ratio, force } => {
            let file = file.unwrap_or_else(|| {
                PathBuf::from(suggested_file_name(chrono::Local::now().date_naive()))
            });
            project_tools::cmd_new(&file, ratio, force)
        }
        Commands::Check { file } => project_tools::cmd_check(&file),
        Commands::Inspect { file, json } => project_tools::cmd_inspect(&file, json, &config),
        Commands::Render {
            file,
            output,
            pixel_ratio,
        } => render_tools::cmd_render(&file, output.as_deref(), pixel_ratio, &config),
        Commands::Preview {
            file,
            width,
            height,
            select,
            output,
        } => render_tools::cmd_preview(&file, width, height, select.as_deref(), &output, &config),
        Commands::ImportImage { file, images } => project_tools::cmd_import_image(&file, &images),
        Commands::Ratio { file, ratio } => project_tools::cmd_ratio(&file, ratio),
        Commands::Add { file, kind, text } => project_tools::cmd_add(&file, kind, text),
        Commands::Presets { json } => render_tools::cmd_presets(json, &config),
        Commands::Fonts => render_tools::cmd_fonts(&config),
    }
}

/// Explicit `--config`, else `./carda.toml` if present, else defaults.
fn load_config(path: Option<&Path>) -> Result<CardaConfig> {
    let mut config = match path {
        Some(path) => CardaConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            if local.is_file() {
                CardaConfig::load_from_file(local)
                    .with_context(|| format!("failed to load config {}", local.display()))?
            } else {
                CardaConfig::default()
            }
        }
    };
    if config.assets.font_dirs.is_empty() {
        config.assets.font_dirs = system_font_dirs();
    }
    Ok(config)
}

/// Assets for rendering `project`; relative image paths resolve next to it.
pub(crate) fn load_assets(config: &CardaConfig, project: Option<&Path>) -> AssetRegistry {
    let mut assets = AssetRegistry::from_config(config);
    assets.set_base_dir(project.and_then(Path::parent).map(Path::to_path_buf));
    report_notices(&assets.refresh());
    assets
}

pub(crate) fn load_project(path: &Path) -> Result<ProjectSnapshot> {
    ProjectSnapshot::load_file(path).map_err(|e| {
        anyhow::anyhow!("{} [{}]", e, e.notice_key())
            .context(format!("failed to load project {}", path.display()))
    })
}

pub(crate) fn report_notices(notices: &[Notice]) {
    for n in notices {
        match &n.layer {
            Some(layer) => tracing::warn!("{} (layer {}): {}", n.key, layer, n.detail),
            None => tracing::warn!("{}: {}", n.key, n.detail),
        }
    }
}
