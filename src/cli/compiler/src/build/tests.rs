/* src/cli/compiler/src/build/tests.rs */

use std::path::Path;

use super::*;
use crate::manifest::read_manifest;
use crate::partition::{API_BUNDLE_DIR, DEFAULT_BUNDLE_DIR};

const PAGES_MANIFEST: &str = r#"{
  "/_app": "pages/_app.js",
  "/_document": "pages/_document.js",
  "/_error": "pages/_error.js",
  "/404": "pages/404.html",
  "/": "pages/index.js",
  "/terms": "pages/terms.html",
  "/blog": "pages/blog.js",
  "/customers": "pages/customers.html",
  "/customers/[post]": "pages/customers/[post].js",
  "/customers/[...catchAll]": "pages/customers/[...catchAll].js",
  "/api/customers": "pages/api/customers.js",
  "/api/customers/[id]": "pages/api/customers/[id].js"
}"#;

fn touch(path: &Path, contents: &str) {
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, contents).unwrap();
}

fn fixture(root: &Path, pages_manifest: &str) -> BuildOptions {
  let app = root.join("app");
  let serverless = app.join(".next/serverless");
  touch(&serverless.join("pages-manifest.json"), pages_manifest);
  let manifest: serde_json::Map<String, serde_json::Value> =
    serde_json::from_str(pages_manifest).unwrap();
  for file in manifest.values() {
    touch(&serverless.join(file.as_str().unwrap()), "module.exports = {};");
  }
  touch(&app.join(".next/cache/webpack/entry"), "cached");
  touch(&app.join(".next/prerender-manifest.json"), "{}");
  touch(&app.join(".next/BUILD_ID"), "abc");
  touch(&app.join("public/favicon.ico"), "");
  touch(&app.join("public/sub/image.png"), "");

  let runtime_dir = root.join("node_modules/@sls-next/lambda-at-edge/dist");
  touch(&runtime_dir.join("default-handler.js"), "// default handler");
  touch(&runtime_dir.join("api-handler.js"), "// api handler");
  let shim = root.join("node_modules/next-aws-cloudfront");
  touch(&shim.join("index.js"), "// shim");

  BuildOptions {
    next_dir: app,
    out_dir: root.join("app/.serverless_nextjs"),
    runtime: Runtime {
      default_handler: runtime_dir.join("default-handler.js"),
      api_handler: runtime_dir.join("api-handler.js"),
      compat_layer: shim,
    },
  }
}

fn build(options: &BuildOptions) -> Result<BuildPlan, BuildError> {
  let plan = plan(options)?;
  apply_plan(&plan)?;
  Ok(plan)
}

fn entries(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}

#[test]
fn default_bundle_layout() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();

  let dir = options.out_dir.join(DEFAULT_BUNDLE_DIR);
  assert_eq!(entries(&dir), vec!["index.js", "manifest.json", "node_modules", "pages"]);
  assert_eq!(std::fs::read_to_string(dir.join("index.js")).unwrap(), "// default handler");
  assert!(dir.join("node_modules/next-aws-cloudfront/index.js").is_file());
  assert_eq!(
    entries(&dir.join("pages")),
    vec!["_app.js", "_document.js", "_error.js", "blog.js", "customers", "index.js"]
  );
  assert_eq!(entries(&dir.join("pages/customers")), vec!["[...catchAll].js", "[post].js"]);
  assert!(!dir.join("pages/api").exists());
}

#[test]
fn api_bundle_layout() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();

  let dir = options.out_dir.join(API_BUNDLE_DIR);
  assert_eq!(entries(&dir), vec!["index.js", "manifest.json", "node_modules", "pages"]);
  assert_eq!(std::fs::read_to_string(dir.join("index.js")).unwrap(), "// api handler");
  assert!(dir.join("node_modules/next-aws-cloudfront/index.js").is_file());
  assert_eq!(entries(&dir.join("pages")), vec!["_error.js", "api"]);
}

#[test]
fn manifests_are_written_per_bundle() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  let plan = build(&options).unwrap();

  let default_manifest: DefaultManifest =
    read_manifest(&options.out_dir.join(DEFAULT_BUNDLE_DIR)).unwrap();
  assert_eq!(default_manifest, plan.default_manifest);
  let html: Vec<_> = default_manifest.pages.html.non_dynamic.keys().collect();
  assert_eq!(html, vec!["/404", "/terms", "/customers"]);
  let ssr: Vec<_> = default_manifest.pages.ssr.dynamic.keys().collect();
  assert_eq!(ssr, vec!["/customers/:post", "/customers/:catchAll*"]);
  assert_eq!(
    default_manifest.public_files.get("/sub/image.png").map(String::as_str),
    Some("sub/image.png")
  );

  let api_manifest: ApiManifest = read_manifest(&options.out_dir.join(API_BUNDLE_DIR)).unwrap();
  assert_eq!(api_manifest.apis.len(), 2);
  assert_eq!(plan.internal_pages, 3);
}

#[test]
fn framework_output_is_cleaned_except_cache() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();
  assert_eq!(entries(&options.dot_next()), vec!["cache"]);
  assert!(options.dot_next().join("cache/webpack/entry").is_file());
}

#[test]
fn rebuild_is_byte_identical_and_drops_stale_files() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();
  let default_dir = options.out_dir.join(DEFAULT_BUNDLE_DIR);
  let api_dir = options.out_dir.join(API_BUNDLE_DIR);
  let first = std::fs::read(default_dir.join("manifest.json")).unwrap();
  touch(&default_dir.join("pages/stale.js"), "old");
  touch(&api_dir.join("pages/api/removed.js"), "old");

  // cleanup removed the framework output, so regenerate it
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();
  let second = std::fs::read(default_dir.join("manifest.json")).unwrap();
  assert_eq!(first, second);
  assert!(!default_dir.join("pages/stale.js").exists());
  assert!(!api_dir.join("pages/api/removed.js").exists());
}

#[test]
fn bundles_share_only_the_error_page() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();
  let default_pages = crate::metadata::list_files(&options.out_dir.join("default-lambda/pages")).unwrap();
  let api_pages = crate::metadata::list_files(&options.out_dir.join("api-lambda/pages")).unwrap();
  let shared: Vec<_> = default_pages.iter().filter(|f| api_pages.contains(f)).collect();
  assert_eq!(shared, vec!["_error.js"]);
  assert!(api_pages.iter().all(|f| f == "_error.js" || f.starts_with("api/")));
}

#[test]
fn api_bundle_is_emptied_when_no_api_routes() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  build(&options).unwrap();

  let without_api = r#"{ "/_error": "pages/_error.js", "/": "pages/index.js" }"#;
  std::fs::remove_dir_all(options.dot_next()).unwrap();
  let options = fixture(tmp.path(), without_api);
  let plan = build(&options).unwrap();
  assert!(!plan.api_manifest.has_routes());
  let api_dir = options.out_dir.join(API_BUNDLE_DIR);
  assert!(api_dir.is_dir());
  assert!(entries(&api_dir).is_empty());
}

#[test]
fn dry_run_plan_writes_nothing() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  let plan = plan(&options).unwrap();
  assert!(!options.out_dir.exists());
  assert!(options.serverless_dir().join("pages-manifest.json").is_file());
  for bundle in &plan.bundles {
    assert!(matches!(bundle.operations.first(), Some(Operation::EmptyDir(_))));
  }
  assert_eq!(plan.bundle(BundleKind::Default).map(BundlePlan::page_count), Some(7));
  assert_eq!(plan.bundle(BundleKind::Api).map(BundlePlan::page_count), Some(3));
}

#[test]
fn conflict_aborts_before_any_write() {
  let tmp = tempfile::tempdir().unwrap();
  let conflicting = r#"{ "/about": "pages/about.js", "/about/": "pages/about/index.js" }"#;
  let options = fixture(tmp.path(), conflicting);
  let err = build(&options).unwrap_err();
  assert!(matches!(err, BuildError::ClassificationConflict { .. }));
  assert!(!options.out_dir.exists());
  assert!(options.serverless_dir().is_dir());
}

#[test]
fn missing_pages_manifest_hints_at_target() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  std::fs::remove_file(options.serverless_dir().join("pages-manifest.json")).unwrap();
  let err = build(&options).unwrap_err();
  assert!(err.to_string().contains("serverless"));
  assert!(!options.out_dir.exists());
}

#[test]
fn missing_handler_fails_the_build() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  std::fs::remove_file(&options.runtime.api_handler).unwrap();
  let err = build(&options).unwrap_err();
  assert!(matches!(err, BuildError::Filesystem { action: "copy", .. }));
  // cleanup only runs after both bundles succeed
  assert!(options.serverless_dir().is_dir());
}

#[test]
fn page_missing_from_disk_fails_the_build() {
  let tmp = tempfile::tempdir().unwrap();
  let options = fixture(tmp.path(), PAGES_MANIFEST);
  std::fs::remove_file(options.serverless_dir().join("pages/blog.js")).unwrap();
  let err = build(&options).unwrap_err();
  match err {
    BuildError::Filesystem { action, path, .. } => {
      assert_eq!(action, "copy");
      assert!(path.ends_with("pages/blog.js"));
    }
    other => panic!("expected filesystem error, got {other:?}"),
  }
  assert!(options.serverless_dir().is_dir());
}

#[test]
fn html_page_under_api_goes_to_the_api_bundle() {
  let tmp = tempfile::tempdir().unwrap();
  let with_html_api = r#"{ "/_error": "pages/_error.js", "/": "pages/index.js", "/api/status": "pages/api/status.html" }"#;
  let options = fixture(tmp.path(), with_html_api);
  let plan = build(&options).unwrap();
  assert!(plan.api_manifest.apis.non_dynamic.contains_key("/api/status"));
  assert!(options.out_dir.join("api-lambda/pages/api/status.html").is_file());
  assert!(!options.out_dir.join("default-lambda/pages/api").exists());
}
