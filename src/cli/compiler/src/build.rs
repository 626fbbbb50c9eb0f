/* src/cli/compiler/src/build.rs */

// One build: read metadata, classify, assemble manifests, plan bundles,
// then apply the plans and clean the framework output.

use std::path::PathBuf;

use crate::classify::classify;
use crate::error::BuildError;
use crate::manifest::{ApiManifest, DefaultManifest, assemble, render};
use crate::metadata::{read_pages_manifest, read_public_files, read_routing_rules};
use crate::partition::{BundleKind, BundlePlan, Operation, Runtime, apply, plan_bundle, plan_cleanup};

#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Application root containing `.next/` and `public/`.
  pub next_dir: PathBuf,
  /// Directory receiving the bundle directories.
  pub out_dir: PathBuf,
  pub runtime: Runtime,
}

impl BuildOptions {
  pub fn dot_next(&self) -> PathBuf {
    self.next_dir.join(".next")
  }

  pub fn serverless_dir(&self) -> PathBuf {
    self.dot_next().join("serverless")
  }
}

/// Everything a build will do, computed without writing anything.
#[derive(Debug, Clone)]
pub struct BuildPlan {
  pub default_manifest: DefaultManifest,
  pub api_manifest: ApiManifest,
  /// Internal pages (`_app`, `_document`, `_error`) seen during classification.
  pub internal_pages: usize,
  pub bundles: Vec<BundlePlan>,
  pub cleanup: Vec<Operation>,
}

impl BuildPlan {
  pub fn bundle(&self, kind: BundleKind) -> Option<&BundlePlan> {
    self.bundles.iter().find(|b| b.kind == kind)
  }
}

/// Compute the full build plan. Classification errors surface here, before
/// any output exists.
pub fn plan(options: &BuildOptions) -> Result<BuildPlan, BuildError> {
  let dot_next = options.dot_next();
  let serverless_dir = options.serverless_dir();

  let pages = read_pages_manifest(&serverless_dir)?;
  let classification = classify(&pages)?;
  let internal_pages = classification.internal_count();
  let page_entries = classification.pages.clone();
  let public_files = read_public_files(&options.next_dir.join("public"))?;
  let rules = read_routing_rules(&dot_next)?;
  let (default_manifest, api_manifest) = assemble(classification, &public_files, rules);

  let default_json = render(&default_manifest)?;
  let api_json = if api_manifest.has_routes() { Some(render(&api_manifest)?) } else { None };

  let runtime = &options.runtime;
  let out_dir = &options.out_dir;
  let bundles = vec![
    plan_bundle(
      BundleKind::Default,
      &page_entries,
      &serverless_dir,
      out_dir,
      runtime,
      Some(default_json),
    )?,
    plan_bundle(BundleKind::Api, &page_entries, &serverless_dir, out_dir, runtime, api_json)?,
  ];
  let cleanup = plan_cleanup(&dot_next)?;

  tracing::debug!(
    pages = pages.len(),
    public_files = public_files.len(),
    api_routes = api_manifest.apis.len(),
    "build planned"
  );

  Ok(BuildPlan { default_manifest, api_manifest, internal_pages, bundles, cleanup })
}

/// Apply bundle plans on scoped threads. The bundles own disjoint
/// directories; operations inside one plan stay sequential.
fn apply_bundles(bundles: &[BundlePlan]) -> Result<(), BuildError> {
  let results: Vec<Result<(), BuildError>> = std::thread::scope(|s| {
    let handles: Vec<_> = bundles
      .iter()
      .map(|bundle| {
        s.spawn(move || {
          let _span = tracing::debug_span!("bundle", kind = %bundle.kind).entered();
          apply(&bundle.operations)
        })
      })
      .collect();
    handles
      .into_iter()
      .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
      .collect()
  });
  results.into_iter().collect()
}

/// Write bundles, then clean the framework output once both are complete.
pub fn apply_plan(plan: &BuildPlan) -> Result<(), BuildError> {
  apply_bundles(&plan.bundles)?;
  apply(&plan.cleanup)
}

#[cfg(test)]
mod tests;
