/* src/cli/compiler/src/metadata.rs */

// Readers for the framework's build output: the serverless pages manifest,
// the optional routes manifest and the public/ asset tree.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::BuildError;
use crate::ordered_map::OrderedMap;

pub const PAGES_MANIFEST: &str = "pages-manifest.json";
pub const ROUTES_MANIFEST: &str = "routes-manifest.json";

/// Route -> page file, in declaration order, duplicates preserved.
pub type PagesManifest = OrderedMap<String>;

/// Framework-level routing rules, passed through to the default manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoutingRules {
  #[serde(default)]
  pub rewrites: Vec<Value>,
  #[serde(default)]
  pub redirects: Vec<Value>,
  #[serde(default)]
  pub headers: Vec<Value>,
}

/// Read `<serverless_dir>/pages-manifest.json`.
pub fn read_pages_manifest(serverless_dir: &Path) -> Result<PagesManifest, BuildError> {
  let path = serverless_dir.join(PAGES_MANIFEST);
  if !path.is_file() {
    return Err(BuildError::MissingPagesManifest { path });
  }
  let content =
    std::fs::read_to_string(&path).map_err(|e| BuildError::fs("read", path.clone(), e))?;
  serde_json::from_str(&content).map_err(|source| BuildError::InvalidMetadata { path, source })
}

/// Read `<dot_next>/routes-manifest.json` when the framework emitted one.
pub fn read_routing_rules(dot_next: &Path) -> Result<RoutingRules, BuildError> {
  let path = dot_next.join(ROUTES_MANIFEST);
  if !path.is_file() {
    return Ok(RoutingRules::default());
  }
  let content =
    std::fs::read_to_string(&path).map_err(|e| BuildError::fs("read", path.clone(), e))?;
  serde_json::from_str(&content).map_err(|source| BuildError::InvalidMetadata { path, source })
}

/// List every file under `dir` as a sorted, `/`-separated relative path.
/// A missing directory yields an empty list.
pub fn list_files(dir: &Path) -> Result<Vec<String>, BuildError> {
  if !dir.is_dir() {
    return Ok(vec![]);
  }
  let mut files = Vec::new();
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(dir).to_path_buf();
      BuildError::fs("walk", path, e.into())
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let Ok(rel) = entry.path().strip_prefix(dir) else {
      continue;
    };
    let rel: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    files.push(rel.join("/"));
  }
  files.sort();
  Ok(files)
}

/// Public assets served as-is: `public/sub/image.png` -> `sub/image.png`.
pub fn read_public_files(public_dir: &Path) -> Result<Vec<String>, BuildError> {
  list_files(public_dir)
}
