/* src/cli/core/src/build/run.rs */

// `edgepack build`: optional framework build, manifest compilation, then
// bundle output followed by cleanup of the framework's intermediate files.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use edgepack_compiler::{BuildPlan, BundlePlan, apply_plan, plan};

use super::config::BuildConfig;
use crate::config::EdgepackConfig;
use crate::shell::run_command;
use crate::ui::{self, DIM, RESET, plural};

pub fn run_build(config: &EdgepackConfig, base_dir: &Path, dry_run: bool) -> Result<()> {
  let started = Instant::now();
  let build_config = BuildConfig::from_edgepack_config(config, base_dir);
  build_config.validate()?;

  ui::banner(if dry_run { "build --dry-run" } else { "build" });

  let total = if build_config.command.is_some() { 3 } else { 2 };
  let mut n = 0;

  if let Some(command) = &build_config.command {
    n += 1;
    ui::step(n, total, "Running framework build");
    run_command(&build_config.next_dir, command, "framework build", &[("NODE_ENV", "production")])?;
    ui::blank();
  }

  n += 1;
  ui::step(n, total, "Compiling route manifests");
  let runtime = build_config.resolve_runtime()?;
  let options = build_config.options(runtime);
  let build_plan = plan(&options).context("failed to compile route manifests")?;
  print_route_summary(&build_plan);
  ui::blank();

  n += 1;
  if dry_run {
    ui::step(n, total, "Planning bundles");
    for bundle in &build_plan.bundles {
      print_operations(base_dir, bundle);
    }
    ui::detail(".next/:");
    for op in &build_plan.cleanup {
      ui::detail(&format!("  {DIM}{op}{RESET}"));
    }
  } else {
    ui::step(n, total, "Writing bundles");
    apply_plan(&build_plan).context("failed to write bundles")?;
    for bundle in &build_plan.bundles {
      print_bundle(base_dir, bundle);
    }
    let removed = build_plan.cleanup.len();
    ui::detail_ok(&format!("removed {removed} .next/ entries, kept .next/cache"));
  }
  ui::blank();

  let elapsed = started.elapsed().as_secs_f64();
  if dry_run {
    ui::ok(&format!("dry run complete in {elapsed:.1}s, nothing written"));
  } else {
    ui::ok(&format!("build complete in {elapsed:.1}s"));
    ui::detail(&relative(base_dir, &options.out_dir));
  }
  Ok(())
}

fn print_route_summary(plan: &BuildPlan) {
  let pages = &plan.default_manifest.pages;
  ui::detail_ok(&format!(
    "{} \u{00b7} {} \u{00b7} {}",
    plural(pages.ssr.len(), "SSR route"),
    plural(pages.html.len(), "HTML page"),
    plural(plan.api_manifest.apis.len(), "API route"),
  ));
  let dynamic = pages.ssr.dynamic.len() + pages.html.dynamic.len() + plan.api_manifest.apis.dynamic.len();
  ui::detail(&format!(
    "{dynamic} dynamic \u{00b7} {} \u{00b7} {}",
    plural(plan.default_manifest.public_files.len(), "public file"),
    plural(plan.internal_pages, "internal page"),
  ));
}

fn print_bundle(base_dir: &Path, bundle: &BundlePlan) {
  let dir = relative(base_dir, &bundle.dir);
  if bundle.operations.len() > 1 {
    ui::detail_ok(&format!("{dir}  {}", plural(bundle.page_count(), "page")));
  } else {
    ui::detail(&format!("{DIM}{dir}  no routes, emptied{RESET}"));
  }
}

fn print_operations(base_dir: &Path, bundle: &BundlePlan) {
  ui::detail(&format!("{}:", relative(base_dir, &bundle.dir)));
  for op in &bundle.operations {
    ui::detail(&format!("  {DIM}{op}{RESET}"));
  }
}

fn relative(base_dir: &Path, path: &Path) -> String {
  path.strip_prefix(base_dir).unwrap_or(path).display().to_string()
}
