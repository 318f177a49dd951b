//! `resize` command.

use anyhow::Result;
use resize_cache::{OutputPublisher, ResizeCache, SiteConfig};

/// Resize a single image and print its public URL on stdout.
pub fn run(config: &SiteConfig, source: &str, options: &str, format: Option<&str>) -> Result<()> {
    let cache = ResizeCache::new(config, OutputPublisher::new(config.output_dir()));
    let url = cache.resize(source, options, format)?;
    println!("{url}");
    Ok(())
}
