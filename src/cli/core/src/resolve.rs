/* src/cli/core/src/resolve.rs */

// `edgepack resolve <path>`: show which bundle and page file serve a request
// path, using the manifests of the last build.

use std::path::Path;

use anyhow::{Context, Result, bail};
use edgepack_compiler::partition::{API_BUNDLE_DIR, DEFAULT_BUNDLE_DIR};
use edgepack_compiler::{
  ApiManifest, ApiTarget, DefaultManifest, PageTarget, read_manifest, resolve_api, resolve_page,
};

use crate::build::config::BuildConfig;
use crate::config::EdgepackConfig;
use crate::ui::{self, CYAN, RESET};

/// Where a request ends up.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
  Page(PageTarget),
  Api(ApiTarget),
}

pub fn run_resolve(config: &EdgepackConfig, base_dir: &Path, path: &str) -> Result<()> {
  let build_config = BuildConfig::from_edgepack_config(config, base_dir);
  let resolution = resolve_in(&build_config.out_dir, path)?;
  match resolution {
    Resolution::Page(PageTarget::Html { route, file }) => {
      ui::ok(&format!("{path} -> {CYAN}{file}{RESET} (static html, route {route})"));
    }
    Resolution::Page(PageTarget::Public { file }) => {
      ui::ok(&format!("{path} -> {CYAN}public/{file}{RESET} (public file)"));
    }
    Resolution::Page(PageTarget::Ssr { route, file }) => {
      ui::ok(&format!("{path} -> {CYAN}{file}{RESET} ({DEFAULT_BUNDLE_DIR}, route {route})"));
    }
    Resolution::Api(ApiTarget::Api { route, file }) => {
      ui::ok(&format!("{path} -> {CYAN}{file}{RESET} ({API_BUNDLE_DIR}, route {route})"));
    }
    Resolution::Page(PageTarget::NotFound) | Resolution::Api(ApiTarget::NotFound) => {
      bail!("no route matches {path}");
    }
  }
  Ok(())
}

/// Resolve against the manifests under `out_dir`. API paths consult only
/// the API bundle; an API bundle without a manifest has no routes.
pub fn resolve_in(out_dir: &Path, path: &str) -> Result<Resolution> {
  if !path.starts_with('/') {
    bail!("request path must start with '/', got \"{path}\"");
  }
  let path = path.split(['?', '#']).next().unwrap_or(path);

  if path == "/api" || path.starts_with("/api/") {
    let api_dir = out_dir.join(API_BUNDLE_DIR);
    if !api_dir.join("manifest.json").is_file() {
      return Ok(Resolution::Api(ApiTarget::NotFound));
    }
    let manifest: ApiManifest = read_manifest(&api_dir).with_context(|| missing_build(API_BUNDLE_DIR))?;
    return Ok(Resolution::Api(resolve_api(&manifest, path)?));
  }

  let manifest: DefaultManifest = read_manifest(&out_dir.join(DEFAULT_BUNDLE_DIR))
    .with_context(|| missing_build(DEFAULT_BUNDLE_DIR))?;
  Ok(Resolution::Page(resolve_page(&manifest, path)?))
}

fn missing_build(bundle: &str) -> String {
  format!("failed to read {bundle} manifest -- run `edgepack build` first")
}
