/* src/cli/core/src/config/tests/mod.rs */

use super::loader::CONFIG_FILE;
use super::*;

mod parsing;
