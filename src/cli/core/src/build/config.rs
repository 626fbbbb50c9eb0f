/* src/cli/core/src/build/config.rs */

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use edgepack_compiler::{BuildOptions, Runtime};

use crate::config::{BundleSection, EdgepackConfig, normalize_path};
use crate::shell::resolve_node_module;

const RUNTIME_PACKAGE: &str = "@sls-next/lambda-at-edge";
const COMPAT_PACKAGES: [&str; 2] = ["next-aws-cloudfront", "@sls-next/next-aws-cloudfront"];

#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub next_dir: PathBuf,
  pub out_dir: PathBuf,
  pub command: Option<String>,
  bundle: BundleSection,
  base_dir: PathBuf,
}

impl BuildConfig {
  pub fn from_edgepack_config(config: &EdgepackConfig, base_dir: &Path) -> Self {
    let next_dir = base_dir.join(&config.build.next_dir);
    let out_dir = next_dir.join(&config.build.out_dir);
    Self {
      next_dir,
      out_dir,
      command: config.build.command.clone(),
      bundle: config.bundle.clone(),
      base_dir: base_dir.to_path_buf(),
    }
  }

  /// Check the resolved output directory against the app root. Catches
  /// absolute `out_dir` values that the config-level check cannot place.
  pub fn validate(&self) -> Result<()> {
    let next_dir = normalize_path(&self.next_dir);
    let out_dir = normalize_path(&self.out_dir);
    if out_dir == next_dir {
      bail!("build.out_dir resolves to the app root {}", next_dir.display());
    }
    if out_dir.starts_with(next_dir.join(".next")) {
      bail!(
        "build.out_dir {} is inside .next/, which is cleaned after every build",
        out_dir.display()
      );
    }
    Ok(())
  }

  /// Locate handler scripts and the compatibility shim: explicit paths from
  /// `[bundle]` first, then node_modules resolution from the app root.
  pub fn resolve_runtime(&self) -> Result<Runtime> {
    let default_handler = self.resolve_file(
      self.bundle.default_handler.as_deref(),
      "bundle.default_handler",
      &format!("{RUNTIME_PACKAGE}/dist/default-handler.js"),
    )?;
    let api_handler = self.resolve_file(
      self.bundle.api_handler.as_deref(),
      "bundle.api_handler",
      &format!("{RUNTIME_PACKAGE}/dist/api-handler.js"),
    )?;
    let compat_layer = match self.bundle.compat_layer.as_deref() {
      Some(path) => self.explicit(path, "bundle.compat_layer")?,
      None => COMPAT_PACKAGES
        .iter()
        .find_map(|pkg| resolve_node_module(&self.next_dir, pkg))
        .ok_or_else(|| {
          anyhow!(
            "compatibility layer not found -- install {} or set bundle.compat_layer",
            COMPAT_PACKAGES[0]
          )
        })?,
    };
    Ok(Runtime { default_handler, api_handler, compat_layer })
  }

  pub fn options(&self, runtime: Runtime) -> BuildOptions {
    BuildOptions { next_dir: self.next_dir.clone(), out_dir: self.out_dir.clone(), runtime }
  }

  fn resolve_file(&self, explicit: Option<&str>, key: &str, module: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
      return self.explicit(path, key);
    }
    resolve_node_module(&self.next_dir, module).ok_or_else(|| {
      let file = module.rsplit('/').next().unwrap_or(module);
      anyhow!("{file} not found -- install {RUNTIME_PACKAGE} or set {key}")
    })
  }

  fn explicit(&self, path: &str, key: &str) -> Result<PathBuf> {
    let resolved = self.base_dir.join(path);
    if !resolved.exists() {
      bail!("{key} not found at {}", resolved.display());
    }
    Ok(resolved)
  }
}
