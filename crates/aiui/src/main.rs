//! aiui CLI - YAML-driven documentation site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "aiui")]
#[command(about = "YAML-driven documentation site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the site config file
    #[arg(short, long, default_value = "aiui.yaml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a config file and sample docs
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Check the config for broken references and patterns
    Validate,

    /// Build static documentation site
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Start development server with hot reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Preview a built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },

    /// Show which template a path resolves to
    Resolve {
        /// URL path, e.g. /docs/intro
        path: String,

        /// Directory with compiled manifests
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config)?;
        }
        Commands::Build { output, no_minify } => {
            commands::build::run(&cli.config, output, !no_minify).await?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(cli.config, port, !no_open).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
        Commands::Resolve { path, dir } => {
            commands::resolve::run(&path, dir).await?;
        }
    }

    Ok(())
}
