//! resize-cache - content-addressed image resizing for static sites.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use resize_cache::config::ConfigError;
use resize_cache::{SiteConfig, log, logger};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Resize {
            source,
            options,
            format,
        } => cli::resize::run(&config, source, options, format.as_deref()),
        Commands::Batch { manifest } => cli::batch::run(&config, manifest),
        Commands::Clean => cli::clean::run(&config),
    }
}

/// Load `site.toml`; without one, the current directory is the site root.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    match SiteConfig::load(&cli.config) {
        Ok(config) => Ok(config),
        Err(ConfigError::Missing(name)) if !cli.config_is_explicit() => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            resize_cache::debug!("config"; "no {} found, using {}", name.display(), cwd.display());
            Ok(SiteConfig::for_root(cwd))
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {}", cli.config.display())),
    }
}
