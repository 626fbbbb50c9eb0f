/* src/cli/core/src/build/mod.rs */

pub mod config;
pub mod run;
