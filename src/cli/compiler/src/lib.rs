/* src/cli/compiler/src/lib.rs */

//! Compiles a serverless Next.js build into edge function bundles.
//!
//! The pages manifest is classified into HTML, SSR and API routes, each
//! bundle gets a deterministic routing manifest, and the compiled pages are
//! partitioned into a default bundle and an API bundle.

pub mod build;
pub mod classify;
mod error;
pub mod manifest;
pub mod metadata;
mod ordered_map;
pub mod partition;
pub mod resolve;
pub mod route;

pub use build::{BuildOptions, BuildPlan, apply_plan, plan};
pub use classify::{Classification, DynamicRoute, PageEntry, PageKind, RouteTable, classify};
pub use error::BuildError;
pub use manifest::{ApiManifest, DefaultManifest, PagesSection, assemble, read_manifest, render};
pub use ordered_map::OrderedMap;
pub use partition::{BundleKind, BundlePlan, Operation, Runtime};
pub use resolve::{ApiTarget, PageTarget, resolve_api, resolve_page};
pub use route::{RoutePath, Segment};
