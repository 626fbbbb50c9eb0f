/* src/cli/compiler/src/route/path.rs */

// Bracket route grammar used by the framework's pages directory:
// `about` is a literal, `[id]` a parameter, `[...slug]` a trailing catch-all.

use std::collections::HashSet;
use std::fmt;

use crate::error::BuildError;

const INTERNAL_PAGES: [&str; 3] = ["_app", "_document", "_error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Param(String),
  CatchAll(String),
}

impl Segment {
  fn parse(raw: &str) -> Result<Self, String> {
    if !raw.contains(['[', ']']) {
      return Ok(Self::Literal(raw.to_string()));
    }
    let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
      if raw.matches('[').count() != raw.matches(']').count() {
        return Err(format!("segment \"{raw}\" has unbalanced brackets"));
      }
      return Err(format!("parameter in \"{raw}\" must span the whole segment"));
    };
    if inner.starts_with('[') {
      return Err(format!("optional catch-all \"{raw}\" is not supported"));
    }
    if inner.contains(['[', ']']) {
      return Err(format!("segment \"{raw}\" has unbalanced brackets"));
    }
    let (name, catch_all) = match inner.strip_prefix("...") {
      Some(name) => (name, true),
      None => (inner, false),
    };
    if name.is_empty() {
      return Err(format!("segment \"{raw}\" has an empty parameter name"));
    }
    if name.starts_with('.') {
      return Err(format!("segment \"{raw}\" has an invalid parameter name"));
    }
    let name = name.to_string();
    Ok(if catch_all { Self::CatchAll(name) } else { Self::Param(name) })
  }

  pub fn is_dynamic(&self) -> bool {
    !matches!(self, Self::Literal(_))
  }

  /// Ordering weight for precedence: literal, then parameter, then catch-all.
  pub(crate) fn rank(&self) -> u8 {
    match self {
      Self::Literal(_) => 0,
      Self::Param(_) => 1,
      Self::CatchAll(_) => 2,
    }
  }

  fn param_name(&self) -> Option<&str> {
    match self {
      Self::Literal(_) => None,
      Self::Param(name) | Self::CatchAll(name) => Some(name),
    }
  }
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal(text) => f.write_str(text),
      Self::Param(name) => write!(f, "[{name}]"),
      Self::CatchAll(name) => write!(f, "[...{name}]"),
    }
  }
}

/// A parsed route. At most one catch-all, always last; parameter names unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
  segments: Vec<Segment>,
}

impl RoutePath {
  pub fn parse(path: &str) -> Result<Self, BuildError> {
    let Some(rest) = path.strip_prefix('/') else {
      return Err(BuildError::malformed(path, "route must start with '/'"));
    };
    if rest.is_empty() {
      return Ok(Self { segments: vec![] });
    }

    let raw_segments: Vec<&str> = rest.split('/').collect();
    let last = raw_segments.len() - 1;
    let mut segments = Vec::with_capacity(raw_segments.len());
    let mut names = HashSet::new();
    for (i, raw) in raw_segments.into_iter().enumerate() {
      if raw.is_empty() {
        return Err(BuildError::malformed(path, "empty path segment"));
      }
      let segment = Segment::parse(raw).map_err(|reason| BuildError::malformed(path, reason))?;
      if matches!(segment, Segment::CatchAll(_)) && i != last {
        return Err(BuildError::malformed(path, format!("catch-all \"{raw}\" must be the last segment")));
      }
      if let Some(name) = segment.param_name()
        && !names.insert(name.to_string())
      {
        return Err(BuildError::malformed(path, format!("parameter \"{name}\" is used twice")));
      }
      segments.push(segment);
    }
    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn is_dynamic(&self) -> bool {
    self.segments.iter().any(Segment::is_dynamic)
  }

  pub fn has_catch_all(&self) -> bool {
    matches!(self.segments.last(), Some(Segment::CatchAll(_)))
  }

  /// Routes under the reserved `/api` prefix belong to the API bundle.
  pub fn is_api(&self) -> bool {
    matches!(self.segments.first(), Some(Segment::Literal(first)) if first == "api")
  }

  /// `_app`, `_document` and `_error` are runtime-only pages.
  pub fn is_internal(&self) -> bool {
    match self.segments.as_slice() {
      [Segment::Literal(name)] => INTERNAL_PAGES.contains(&name.as_str()),
      _ => false,
    }
  }

  /// The error page is the one internal page the API bundle also carries.
  pub fn is_error_page(&self) -> bool {
    matches!(self.segments.as_slice(), [Segment::Literal(name)] if name == "_error")
  }

  /// Parse a manifest key back into a route: `:id` is a parameter and
  /// `:slug*` a catch-all.
  pub fn from_express(key: &str) -> Result<Self, BuildError> {
    let bracketed: Vec<String> = key
      .split('/')
      .map(|segment| match segment.strip_prefix(':') {
        Some(name) => match name.strip_suffix('*') {
          Some(name) => format!("[...{name}]"),
          None => format!("[{name}]"),
        },
        None => segment.to_string(),
      })
      .collect();
    Self::parse(&bracketed.join("/"))
  }

  /// Express-style form used as manifest keys: `/posts/:id`, `/docs/:slug*`.
  pub fn to_express(&self) -> String {
    if self.segments.is_empty() {
      return "/".to_string();
    }
    let mut out = String::new();
    for segment in &self.segments {
      out.push('/');
      match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Param(name) => {
          out.push(':');
          out.push_str(name);
        }
        Segment::CatchAll(name) => {
          out.push(':');
          out.push_str(name);
          out.push('*');
        }
      }
    }
    out
  }

  /// Name-independent form; two routes with the same shape match the same URLs.
  pub(crate) fn shape(&self) -> String {
    if self.segments.is_empty() {
      return "/".to_string();
    }
    let mut out = String::new();
    for segment in &self.segments {
      out.push('/');
      match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Param(_) => out.push_str("[]"),
        Segment::CatchAll(_) => out.push_str("[...]"),
      }
    }
    out
  }
}

impl fmt::Display for RoutePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.segments.is_empty() {
      return f.write_str("/");
    }
    for segment in &self.segments {
      write!(f, "/{segment}")?;
    }
    Ok(())
  }
}

/// Derive a route from a compiled page file:
/// `pages/index.js` -> `/`, `pages/blog/index.html` -> `/blog`,
/// `pages/customers/[customer].js` -> `/customers/[customer]`.
pub fn route_from_file(file: &str) -> Result<String, BuildError> {
  let Some(rel) = file.strip_prefix("pages/") else {
    return Err(BuildError::malformed(file, "page file is outside the pages/ directory"));
  };
  let (dir, name) = match rel.rsplit_once('/') {
    Some((dir, name)) => (Some(dir), name),
    None => (None, rel),
  };
  // Dots inside a `[...name]` bracket are not an extension.
  let bracket_end = name.rfind(']').map_or(0, |i| i + 1);
  let stem = match name[bracket_end..].rfind('.') {
    Some(dot) => &name[..bracket_end + dot],
    None => name,
  };
  let route = match (dir, stem) {
    (None, "index") => String::new(),
    (None, stem) => format!("/{stem}"),
    (Some(dir), "index") => format!("/{dir}"),
    (Some(dir), stem) => format!("/{dir}/{stem}"),
  };
  Ok(if route.is_empty() { "/".to_string() } else { route })
}
