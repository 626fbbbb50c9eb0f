/* src/cli/core/src/clean.rs */

// `edgepack clean` command: removes the bundle output directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::build::config::BuildConfig;
use crate::config::EdgepackConfig;
use crate::ui;

pub fn run_clean(config: &EdgepackConfig, base_dir: &Path) -> Result<()> {
  ui::arrow(&format!("cleaning {}", config.project.name));
  let build_config = BuildConfig::from_edgepack_config(config, base_dir);
  build_config.validate()?;
  delete_dir_if_exists(&build_config.out_dir)?;
  ui::ok("clean complete");
  Ok(())
}

fn delete_dir_if_exists(path: &Path) -> Result<()> {
  if path.exists() {
    std::fs::remove_dir_all(path)
      .with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("deleted {}", path.display()));
  }
  Ok(())
}
