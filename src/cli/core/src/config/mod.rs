/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{find_edgepack_config, load_edgepack_config};
pub use types::{BundleSection, EdgepackConfig};
pub(crate) use types::normalize_path;
