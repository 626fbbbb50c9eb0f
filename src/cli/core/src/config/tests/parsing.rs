/* src/cli/core/src/config/tests/parsing.rs */

use std::path::Path;

use super::*;

#[test]
fn parse_minimal_config() {
  let toml_str = r#"
[project]
name = "my-app"
"#;
  let config: EdgepackConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.project.name, "my-app");
  assert_eq!(config.build.next_dir, ".");
  assert_eq!(config.build.out_dir, ".serverless_nextjs");
  assert!(config.build.command.is_none());
  assert!(config.bundle.default_handler.is_none());
  assert!(config.bundle.compat_layer.is_none());
  config.validate().unwrap();
}

#[test]
fn parse_full_config() {
  let toml_str = r#"
[project]
name = "storefront"

[build]
next_dir = "apps/web"
out_dir = "dist/lambda"
command = "npx next build"

[bundle]
default_handler = "runtime/default-handler.js"
api_handler = "runtime/api-handler.js"
compat_layer = "runtime/compat"
"#;
  let config: EdgepackConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.build.next_dir, "apps/web");
  assert_eq!(config.build.out_dir, "dist/lambda");
  assert_eq!(config.build.command.as_deref(), Some("npx next build"));
  assert_eq!(config.bundle.default_handler.as_deref(), Some("runtime/default-handler.js"));
  assert_eq!(config.bundle.api_handler.as_deref(), Some("runtime/api-handler.js"));
  assert_eq!(config.bundle.compat_layer.as_deref(), Some("runtime/compat"));
}

#[test]
fn missing_project_is_an_error() {
  let result: Result<EdgepackConfig, _> = toml::from_str("[build]\nout_dir = \"out\"\n");
  assert!(result.is_err());
}

#[test]
fn out_dir_inside_next_is_rejected() {
  let toml_str = r#"
[project]
name = "my-app"

[build]
out_dir = ".next/bundles"
"#;
  let config: EdgepackConfig = toml::from_str(toml_str).unwrap();
  let err = config.validate().unwrap_err();
  assert!(err.to_string().contains(".next"));
}

#[test]
fn out_dir_must_be_a_subdirectory() {
  let toml_str = r#"
[project]
name = "my-app"

[build]
out_dir = "./"
"#;
  let config: EdgepackConfig = toml::from_str(toml_str).unwrap();
  assert!(config.validate().is_err());
}

#[test]
fn out_dir_reaching_next_through_dots_is_rejected() {
  for out_dir in ["./.next/out", "web/../.next/out", ".next/./bundles/", "./.next"] {
    let toml_str = format!("[project]\nname = \"my-app\"\n\n[build]\nout_dir = \"{out_dir}\"\n");
    let config: EdgepackConfig = toml::from_str(&toml_str).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains(".next"), "{out_dir} should be rejected");
  }
}

#[test]
fn out_dir_resolving_to_app_root_is_rejected() {
  for out_dir in ["./", "dist/..", "."] {
    let toml_str = format!("[project]\nname = \"my-app\"\n\n[build]\nout_dir = \"{out_dir}\"\n");
    let config: EdgepackConfig = toml::from_str(&toml_str).unwrap();
    assert!(config.validate().is_err(), "{out_dir} should be rejected");
  }
}

#[test]
fn out_dir_outside_app_root_is_accepted() {
  let toml_str = "[project]\nname = \"my-app\"\n\n[build]\nout_dir = \"../deploy/.next-bundles\"\n";
  let config: EdgepackConfig = toml::from_str(toml_str).unwrap();
  config.validate().unwrap();
}

#[test]
fn normalize_path_resolves_dots() {
  assert_eq!(normalize_path(Path::new("./.next/out")), Path::new(".next/out"));
  assert_eq!(normalize_path(Path::new("web/../.next/out")), Path::new(".next/out"));
  assert_eq!(normalize_path(Path::new("../a/./b/..")), Path::new("../a"));
  assert_eq!(normalize_path(Path::new("/srv/app/../.next")), Path::new("/srv/.next"));
  assert_eq!(normalize_path(Path::new("dist/..")), Path::new(""));
}
