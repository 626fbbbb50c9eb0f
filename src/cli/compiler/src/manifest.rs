/* src/cli/compiler/src/manifest.rs */

// Per-bundle manifest documents. Field order below is the JSON key order,
// and identical inputs always serialize to identical bytes.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::{Classification, RouteTable};
use crate::error::BuildError;
use crate::metadata::RoutingRules;
use crate::ordered_map::OrderedMap;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagesSection {
  pub ssr: RouteTable,
  pub html: RouteTable,
}

/// Manifest of the page-rendering bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultManifest {
  pub public_files: OrderedMap<String>,
  pub pages: PagesSection,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub rewrites: Vec<Value>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub redirects: Vec<Value>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub headers: Vec<Value>,
}

/// Manifest of the API bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiManifest {
  pub apis: RouteTable,
}

impl ApiManifest {
  pub fn has_routes(&self) -> bool {
    !self.apis.is_empty()
  }
}

/// Merge a classification, the public asset list and routing rules into the
/// two bundle manifests.
pub fn assemble(
  classification: Classification,
  public_files: &[String],
  rules: RoutingRules,
) -> (DefaultManifest, ApiManifest) {
  let mut sorted: Vec<&String> = public_files.iter().collect();
  sorted.sort();
  let public_files = sorted.into_iter().map(|file| (format!("/{file}"), file.clone())).collect();

  let default_manifest = DefaultManifest {
    public_files,
    pages: PagesSection { ssr: classification.ssr, html: classification.html },
    rewrites: rules.rewrites,
    redirects: rules.redirects,
    headers: rules.headers,
  };
  let api_manifest = ApiManifest { apis: classification.api };
  (default_manifest, api_manifest)
}

/// Render a manifest as pretty JSON with a trailing newline.
pub fn render<T: Serialize>(manifest: &T) -> Result<String, BuildError> {
  let mut json = serde_json::to_string_pretty(manifest)?;
  json.push('\n');
  Ok(json)
}

/// Read `<bundle_dir>/manifest.json` back from a finished build.
pub fn read_manifest<T: DeserializeOwned>(bundle_dir: &Path) -> Result<T, BuildError> {
  let path = bundle_dir.join(MANIFEST_FILE);
  let content =
    std::fs::read_to_string(&path).map_err(|e| BuildError::fs("read", path.clone(), e))?;
  serde_json::from_str(&content).map_err(|source| BuildError::InvalidMetadata { path, source })
}
