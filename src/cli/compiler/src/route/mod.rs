/* src/cli/compiler/src/route/mod.rs */

// Route grammar and pattern compilation shared by the classifier and resolver.

mod path;
mod pattern;


pub use path::{RoutePath, Segment, route_from_file};
pub use pattern::{compare_specificity, compile_pattern};
