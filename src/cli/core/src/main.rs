/* src/cli/core/src/main.rs */

mod build;
mod clean;
mod config;
mod resolve;
mod shell;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{EdgepackConfig, find_edgepack_config, load_edgepack_config};

#[derive(Parser)]
#[command(name = "edgepack", version, about = "Compile serverless Next.js builds into edge bundles")]
struct Cli {
  /// Log debug events to stderr (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Classify routes, write bundle manifests and partition build output
  Build {
    /// Path to edgepack.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the planned file operations without writing anything
    #[arg(long)]
    dry_run: bool,
  },
  /// Remove the bundle output directory
  Clean {
    /// Path to edgepack.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Show which bundle and page serve a request path
  Resolve {
    /// Request path, e.g. /customers/acme
    path: String,
    /// Path to edgepack.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "edgepack_compiler=debug,edgepack_cli=debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

/// Resolve config path (explicit or auto-detected) and parse it
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, EdgepackConfig)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_edgepack_config(&cwd)?
    }
  };
  let config = load_edgepack_config(&path)?;
  Ok((path, config))
}

fn base_dir(config_path: &Path) -> &Path {
  config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Command::Build { config, dry_run } => {
      let (config_path, edgepack_config) = resolve_config(config)?;
      build::run::run_build(&edgepack_config, base_dir(&config_path), dry_run)?;
    }
    Command::Clean { config } => {
      let (config_path, edgepack_config) = resolve_config(config)?;
      clean::run_clean(&edgepack_config, base_dir(&config_path))?;
    }
    Command::Resolve { path, config } => {
      let (config_path, edgepack_config) = resolve_config(config)?;
      resolve::run_resolve(&edgepack_config, base_dir(&config_path), &path)?;
    }
  }

  Ok(())
}
