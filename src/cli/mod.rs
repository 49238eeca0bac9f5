// src/cli/mod.rs
//
// Command-line interface module

pub mod args;
pub mod output;

pub use args::{Cli, Command};
