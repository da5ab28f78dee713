//! Coverforge CLI: headless host for the cover compositor.
//!
//! Usage:
//!   coverforge render [OPTIONS]   Replay an edit script and export image.webp
//!   coverforge check              Check configured assets and output directory
//!   coverforge init [PATH]        Write a sample edit script

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coverforge_common::config::{config_file_path, AppConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "coverforge",
    about = "Compose blog cover images from a background, a title, and a logo",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/coverforge/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an edit script and export the cover
    Render {
        /// JSONL edit script to replay
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Background image
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Title text
        #[arg(long)]
        title: Option<String>,

        /// Subtitle text (drawn upper-case above the title)
        #[arg(long)]
        subtitle: Option<String>,

        /// Fill color, e.g. "#112233" or "rgb(10 20 30)"
        #[arg(long)]
        color: Option<String>,

        /// Fit the background to the canvas before replaying the script
        #[arg(long)]
        fit: bool,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check configured assets and the output directory
    Check,

    /// Write a sample edit script
    Init {
        /// Script path
        #[arg(default_value = "cover.jsonl")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let config = AppConfig::load_from(&config_path);

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    coverforge_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Render {
            script,
            background,
            title,
            subtitle,
            color,
            fit,
            output,
        } => {
            commands::render::run(
                config,
                commands::render::RenderArgs {
                    script,
                    background,
                    title,
                    subtitle,
                    color,
                    fit,
                    output,
                },
            )
            .await
        }
        Commands::Check => commands::check::run(config, &config_path).await,
        Commands::Init { path, force } => commands::init::run(path, force),
    }
}
