/* src/cli/compiler/src/partition.rs */

// Splits the framework output into the default and API bundles.
// Planning is pure; `apply` is the only place that touches the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::classify::{PageEntry, PageKind};
use crate::error::BuildError;
use crate::manifest::MANIFEST_FILE;
use crate::metadata::list_files;

pub const DEFAULT_BUNDLE_DIR: &str = "default-lambda";
pub const API_BUNDLE_DIR: &str = "api-lambda";
pub const COMPAT_LAYER_DIR: &str = "node_modules/next-aws-cloudfront";
pub const HANDLER_FILE: &str = "index.js";

/// Framework output entries kept across builds.
const PRESERVED_ENTRIES: [&str; 1] = ["cache"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleKind {
  Default,
  Api,
}

impl BundleKind {
  pub fn dir_name(self) -> &'static str {
    match self {
      Self::Default => DEFAULT_BUNDLE_DIR,
      Self::Api => API_BUNDLE_DIR,
    }
  }

  /// Whether this bundle carries a classified page. Static HTML pages go to
  /// neither bundle; the error page goes to both.
  pub fn carries(self, page: &PageEntry) -> bool {
    match (self, page.kind) {
      (Self::Default, PageKind::Ssr | PageKind::Internal) => true,
      (Self::Api, PageKind::Api) => true,
      (Self::Api, PageKind::Internal) => page.route.is_error_page(),
      _ => false,
    }
  }
}

impl fmt::Display for BundleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.dir_name())
  }
}

/// One filesystem step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
  /// Remove the directory if present, then recreate it empty.
  EmptyDir(PathBuf),
  CopyFile { from: PathBuf, to: PathBuf },
  CopyDir { from: PathBuf, to: PathBuf },
  WriteFile { path: PathBuf, contents: String },
  /// Remove a file or directory tree; a missing target is not an error.
  Remove(PathBuf),
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyDir(path) => write!(f, "empty  {}", path.display()),
      Self::CopyFile { from, to } => write!(f, "copy   {} -> {}", from.display(), to.display()),
      Self::CopyDir { from, to } => write!(f, "copy   {}/ -> {}/", from.display(), to.display()),
      Self::WriteFile { path, contents } => {
        write!(f, "write  {} ({} bytes)", path.display(), contents.len())
      }
      Self::Remove(path) => write!(f, "remove {}", path.display()),
    }
  }
}

/// Runtime files that every bundle carries besides the compiled pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
  pub default_handler: PathBuf,
  pub api_handler: PathBuf,
  /// Directory of the request/response compatibility shim package.
  pub compat_layer: PathBuf,
}

impl Runtime {
  fn handler(&self, kind: BundleKind) -> &Path {
    match kind {
      BundleKind::Default => &self.default_handler,
      BundleKind::Api => &self.api_handler,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePlan {
  pub kind: BundleKind,
  pub dir: PathBuf,
  pub operations: Vec<Operation>,
}

impl BundlePlan {
  /// Number of page files this plan copies.
  pub fn page_count(&self) -> usize {
    let pages = self.dir.join("pages");
    self
      .operations
      .iter()
      .filter(|op| matches!(op, Operation::CopyFile { to, .. } if to.starts_with(&pages)))
      .count()
  }
}

/// Plan one bundle. The plan always starts by emptying the bundle directory;
/// with `manifest_json` absent nothing else is written, so an unused bundle
/// never keeps files from an earlier build.
///
/// Every classified page the bundle carries gets a copy step, so a page the
/// manifest names but the disk lacks fails in `apply`. Files next to a page
/// that extend its name (`index.js.map`) travel with it.
pub fn plan_bundle(
  kind: BundleKind,
  pages: &[PageEntry],
  serverless_dir: &Path,
  out_dir: &Path,
  runtime: &Runtime,
  manifest_json: Option<String>,
) -> Result<BundlePlan, BuildError> {
  let dir = out_dir.join(kind.dir_name());
  let mut operations = vec![Operation::EmptyDir(dir.clone())];

  let Some(manifest_json) = manifest_json else {
    return Ok(BundlePlan { kind, dir, operations });
  };

  operations.push(Operation::CopyFile {
    from: runtime.handler(kind).to_path_buf(),
    to: dir.join(HANDLER_FILE),
  });
  operations.push(Operation::WriteFile { path: dir.join(MANIFEST_FILE), contents: manifest_json });
  operations.push(Operation::CopyDir {
    from: runtime.compat_layer.clone(),
    to: dir.join(COMPAT_LAYER_DIR),
  });

  for page in pages.iter().filter(|page| kind.carries(page)) {
    operations.push(Operation::CopyFile {
      from: serverless_dir.join(&page.file),
      to: dir.join(&page.file),
    });
  }

  for rel in list_files(&serverless_dir.join("pages"))? {
    let file = format!("pages/{rel}");
    if pages.iter().any(|page| page.file == file) {
      continue;
    }
    let owner = pages.iter().find(|page| {
      file.strip_prefix(page.file.as_str()).is_some_and(|suffix| suffix.starts_with('.'))
    });
    match owner {
      Some(page) if kind.carries(page) => operations.push(Operation::CopyFile {
        from: serverless_dir.join(&file),
        to: dir.join(&file),
      }),
      Some(_) => {}
      None => tracing::debug!(%file, bundle = %kind, "skipping file without a page"),
    }
  }

  Ok(BundlePlan { kind, dir, operations })
}

/// Plan removal of everything in the framework output directory except the
/// incremental build cache.
pub fn plan_cleanup(dot_next: &Path) -> Result<Vec<Operation>, BuildError> {
  if !dot_next.is_dir() {
    return Ok(vec![]);
  }
  let entries = std::fs::read_dir(dot_next).map_err(|e| BuildError::fs("read", dot_next, e))?;
  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| BuildError::fs("read", dot_next, e))?;
    let name = entry.file_name().to_string_lossy().into_owned();
    if !PRESERVED_ENTRIES.contains(&name.as_str()) {
      names.push(name);
    }
  }
  names.sort();
  Ok(names.into_iter().map(|name| Operation::Remove(dot_next.join(name))).collect())
}

/// Execute operations strictly in order, stopping at the first failure.
pub fn apply(operations: &[Operation]) -> Result<(), BuildError> {
  for op in operations {
    tracing::trace!(%op, "apply");
    match op {
      Operation::EmptyDir(path) => {
        if path.exists() {
          std::fs::remove_dir_all(path).map_err(|e| BuildError::fs("empty", path, e))?;
        }
        std::fs::create_dir_all(path).map_err(|e| BuildError::fs("create", path, e))?;
      }
      Operation::CopyFile { from, to } => {
        ensure_parent(to)?;
        std::fs::copy(from, to).map_err(|e| BuildError::fs("copy", from, e))?;
      }
      Operation::CopyDir { from, to } => copy_dir(from, to)?,
      Operation::WriteFile { path, contents } => {
        ensure_parent(path)?;
        std::fs::write(path, contents).map_err(|e| BuildError::fs("write", path, e))?;
      }
      Operation::Remove(path) => remove(path)?,
    }
  }
  Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), BuildError> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(|e| BuildError::fs("create", parent, e))?;
  }
  Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), BuildError> {
  if !from.is_dir() {
    return Err(BuildError::fs(
      "copy",
      from,
      std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
    ));
  }
  for entry in WalkDir::new(from).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(from).to_path_buf();
      BuildError::fs("walk", path, e.into())
    })?;
    let Ok(relative) = entry.path().strip_prefix(from) else {
      continue;
    };
    let target = to.join(relative);
    if entry.file_type().is_dir() {
      std::fs::create_dir_all(&target).map_err(|e| BuildError::fs("create", &target, e))?;
    } else {
      ensure_parent(&target)?;
      std::fs::copy(entry.path(), &target).map_err(|e| BuildError::fs("copy", entry.path(), e))?;
    }
  }
  Ok(())
}

fn remove(path: &Path) -> Result<(), BuildError> {
  let result = if path.is_dir() { std::fs::remove_dir_all(path) } else { std::fs::remove_file(path) };
  match result {
    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(BuildError::fs("remove", path, e)),
    _ => Ok(()),
  }
}
