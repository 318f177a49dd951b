//! Command-line interface module.

mod args;
pub mod batch;
pub mod clean;
pub mod resize;

pub use args::{Cli, Commands};
