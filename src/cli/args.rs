//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "site.toml";

/// Content-addressed image resize cache
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print cache hits and other debug output
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether `--config` names a file other than the default.
    pub fn config_is_explicit(&self) -> bool {
        self.config.as_os_str() != DEFAULT_CONFIG
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resize one image and print its URL
    #[command(visible_alias = "r")]
    Resize {
        /// Source image, relative to the site root
        #[arg(value_hint = clap::ValueHint::FilePath)]
        source: String,

        /// Geometry, optionally with an embedded format (e.g. "800x800 webp")
        options: String,

        /// Output format (jpg, jpeg, webp); overrides any embedded format
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Resize every entry of a TOML manifest in parallel
    #[command(visible_alias = "b")]
    Batch {
        /// Manifest with `[[resize]]` entries
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,
    },

    /// Remove the cache directory
    Clean,
}
