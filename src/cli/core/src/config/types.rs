/* src/cli/core/src/config/types.rs */

use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct EdgepackConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub bundle: BundleSection,
}

impl EdgepackConfig {
  pub fn validate(&self) -> Result<()> {
    self.build.validate()
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
  /// Next.js application root, relative to edgepack.toml.
  #[serde(default = "default_next_dir")]
  pub next_dir: String,
  /// Bundle output directory, relative to `next_dir`.
  #[serde(default = "default_out_dir")]
  pub out_dir: String,
  /// Framework build command run before compiling (e.g. `npx next build`).
  pub command: Option<String>,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self { next_dir: default_next_dir(), out_dir: default_out_dir(), command: None }
  }
}

impl BuildSection {
  /// Reject an `out_dir` that is the app root itself or lies inside `.next/`.
  /// Absolute paths are checked once they resolve, in `BuildConfig::validate`.
  pub fn validate(&self) -> Result<()> {
    let out_dir = Path::new(&self.out_dir);
    if out_dir.is_absolute() {
      return Ok(());
    }
    let out_dir = normalize_path(out_dir);
    if out_dir.as_os_str().is_empty() {
      bail!("build.out_dir must name a subdirectory, got \"{}\"", self.out_dir);
    }
    if out_dir.starts_with(".next") {
      bail!("build.out_dir \"{}\" is inside .next/, which is cleaned after every build", self.out_dir);
    }
    Ok(())
  }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
/// Leading `..` components of a relative path are kept.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
  path.components().fold(PathBuf::new(), |mut acc, component| {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if matches!(acc.components().next_back(), Some(Component::Normal(_))) {
          acc.pop();
        } else if !acc.has_root() {
          acc.push("..");
        }
      }
      other => acc.push(other.as_os_str()),
    }
    acc
  })
}

fn default_next_dir() -> String {
  ".".to_string()
}

fn default_out_dir() -> String {
  ".serverless_nextjs".to_string()
}

/// Runtime files copied into every bundle. Unset paths resolve from node_modules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleSection {
  pub default_handler: Option<String>,
  pub api_handler: Option<String>,
  pub compat_layer: Option<String>,
}
