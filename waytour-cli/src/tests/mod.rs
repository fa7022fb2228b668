//! Shared test harness modules for the waytour CLI.

use super::*;

mod helpers;
mod input_unit;
