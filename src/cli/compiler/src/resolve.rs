/* src/cli/compiler/src/resolve.rs */

// Request-path resolution against built manifests: fixed routes, then the
// most specific parameterized route, then catch-alls.

use std::cmp::Ordering;

use regex::Regex;

use crate::classify::RouteTable;
use crate::error::BuildError;
use crate::manifest::{ApiManifest, DefaultManifest};
use crate::route::{RoutePath, compare_specificity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
  Html { route: String, file: String },
  Public { file: String },
  Ssr { route: String, file: String },
  NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiTarget {
  Api { route: String, file: String },
  NotFound,
}

#[derive(Debug, Clone, Copy)]
enum Rendering {
  Html,
  Ssr,
}

fn normalize(path: &str) -> &str {
  match path.strip_suffix('/') {
    Some(trimmed) if !trimmed.is_empty() => trimmed,
    _ => path,
  }
}

fn is_catch_all(route: &str) -> bool {
  route.ends_with('*')
}

/// Most specific dynamic route across `tables` that matches `path`, looking
/// only at catch-all routes or only at the others. Ties keep the earlier
/// table and the earlier entry.
fn best_dynamic<T: Copy>(
  tables: &[(T, &RouteTable)],
  path: &str,
  catch_all: bool,
) -> Result<Option<(T, String, String)>, BuildError> {
  let mut best: Option<(RoutePath, T, &str, &str)> = None;
  for &(tag, table) in tables {
    for (key, entry) in table.dynamic.iter() {
      if is_catch_all(key) != catch_all {
        continue;
      }
      let re = Regex::new(&entry.regex)
        .map_err(|source| BuildError::InvalidPattern { route: key.to_string(), source })?;
      if !re.is_match(path) {
        continue;
      }
      let route = RoutePath::from_express(key)?;
      if best.as_ref().is_none_or(|(current, ..)| compare_specificity(&route, current) == Ordering::Less) {
        best = Some((route, tag, key, entry.file.as_str()));
      }
    }
  }
  Ok(best.map(|(_, tag, key, file)| (tag, key.to_string(), file.to_string())))
}

/// Resolve a page request against the default bundle's manifest.
///
/// Fixed HTML pages win over public files, which win over fixed SSR pages.
/// Dynamic routes of both tables compete on specificity: any non-catch-all
/// match beats every catch-all, then more literal segments win. Table order
/// never decides.
pub fn resolve_page(manifest: &DefaultManifest, path: &str) -> Result<PageTarget, BuildError> {
  let normalized = normalize(path);
  let pages = &manifest.pages;

  if let Some(file) = pages.html.non_dynamic.get(normalized) {
    return Ok(PageTarget::Html { route: normalized.to_string(), file: file.clone() });
  }
  if let Some(file) = manifest.public_files.get(normalized) {
    return Ok(PageTarget::Public { file: file.clone() });
  }
  if let Some(file) = pages.ssr.non_dynamic.get(normalized) {
    return Ok(PageTarget::Ssr { route: normalized.to_string(), file: file.clone() });
  }

  let tables = [(Rendering::Html, &pages.html), (Rendering::Ssr, &pages.ssr)];
  for catch_all in [false, true] {
    if let Some((rendering, route, file)) = best_dynamic(&tables, path, catch_all)? {
      tracing::debug!(path, %route, ?rendering, "matched dynamic page");
      return Ok(match rendering {
        Rendering::Html => PageTarget::Html { route, file },
        Rendering::Ssr => PageTarget::Ssr { route, file },
      });
    }
  }
  Ok(PageTarget::NotFound)
}

/// Resolve an API request against the API bundle's manifest.
pub fn resolve_api(manifest: &ApiManifest, path: &str) -> Result<ApiTarget, BuildError> {
  let normalized = normalize(path);
  if let Some(file) = manifest.apis.non_dynamic.get(normalized) {
    return Ok(ApiTarget::Api { route: normalized.to_string(), file: file.clone() });
  }
  for catch_all in [false, true] {
    if let Some(((), route, file)) = best_dynamic(&[((), &manifest.apis)], path, catch_all)? {
      return Ok(ApiTarget::Api { route, file });
    }
  }
  Ok(ApiTarget::NotFound)
}
