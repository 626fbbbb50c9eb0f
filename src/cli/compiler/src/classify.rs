/* src/cli/compiler/src/classify.rs */

// Sorts every compiled page into HTML, SSR or API, and each of those into
// fixed-path and parameterized routes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::metadata::PagesManifest;
use crate::ordered_map::OrderedMap;
use crate::route::{RoutePath, compare_specificity, compile_pattern, route_from_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
  /// Statically rendered at build time, served without a function call.
  Html,
  /// Rendered per request by the default bundle.
  Ssr,
  /// Handled by the API bundle.
  Api,
  /// `_app`, `_document`, `_error`: copied into the default bundle, never routed.
  Internal,
}

impl PageKind {
  /// The one rule deciding where a page file goes. The `/api` prefix wins
  /// over the `.html` extension.
  pub fn of(route: &RoutePath, file: &str) -> Self {
    if route.is_internal() {
      Self::Internal
    } else if route.is_api() {
      Self::Api
    } else if file.ends_with(".html") {
      Self::Html
    } else {
      Self::Ssr
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
  pub route: RoutePath,
  pub file: String,
  pub kind: PageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRoute {
  pub file: String,
  pub regex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
  pub dynamic: OrderedMap<DynamicRoute>,
  pub non_dynamic: OrderedMap<String>,
}

impl RouteTable {
  pub fn len(&self) -> usize {
    self.dynamic.len() + self.non_dynamic.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dynamic.is_empty() && self.non_dynamic.is_empty()
  }

  fn from_entries(entries: &[&PageEntry]) -> Self {
    let mut table = Self::default();
    let mut dynamic: Vec<&PageEntry> = Vec::new();
    for &entry in entries {
      if entry.route.is_dynamic() {
        dynamic.push(entry);
      } else {
        table.non_dynamic.push(entry.route.to_string(), entry.file.clone());
      }
    }
    dynamic.sort_by(|a, b| compare_specificity(&a.route, &b.route));
    for entry in dynamic {
      let regex = compile_pattern(&entry.route);
      table.dynamic.push(entry.route.to_express(), DynamicRoute { file: entry.file.clone(), regex });
    }
    table
  }
}

/// Result of one classification pass, discarded after manifest assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
  pub html: RouteTable,
  pub ssr: RouteTable,
  pub api: RouteTable,
  /// Every classified page file in manifest order, internal pages included.
  /// Bundle partitioning copies exactly these.
  pub pages: Vec<PageEntry>,
}

impl Classification {
  pub fn internal_count(&self) -> usize {
    self.pages.iter().filter(|p| p.kind == PageKind::Internal).count()
  }
}

/// Classify the pages manifest. Fails on the first malformed route or on two
/// files that resolve to the same route (including routes that differ only
/// in parameter names).
pub fn classify(pages: &PagesManifest) -> Result<Classification, BuildError> {
  let mut by_key: HashMap<&str, &str> = HashMap::new();
  let mut by_shape: HashMap<String, String> = HashMap::new();
  let mut entries = Vec::new();

  for (key, file) in pages.iter() {
    if let Some(first) = by_key.insert(key, file) {
      return Err(BuildError::ClassificationConflict {
        route: key.to_string(),
        first: first.to_string(),
        second: file.clone(),
      });
    }

    let route = RoutePath::parse(&route_from_file(file)?)?;
    if let Some(first) = by_shape.insert(route.shape(), file.clone()) {
      return Err(BuildError::ClassificationConflict {
        route: route.to_string(),
        first,
        second: file.clone(),
      });
    }

    let kind = PageKind::of(&route, file);
    tracing::debug!(route = %route, file = %file, ?kind, dynamic = route.is_dynamic(), "classified page");
    entries.push(PageEntry { route, file: file.clone(), kind });
  }

  let table = |kind: PageKind| {
    let of_kind: Vec<&PageEntry> = entries.iter().filter(|e| e.kind == kind).collect();
    RouteTable::from_entries(&of_kind)
  };
  Ok(Classification {
    html: table(PageKind::Html),
    ssr: table(PageKind::Ssr),
    api: table(PageKind::Api),
    pages: entries,
  })
}
