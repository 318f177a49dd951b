//! `clean` command.

use anyhow::{Context, Result};
use resize_cache::{SiteConfig, cache, log};

pub fn run(config: &SiteConfig) -> Result<()> {
    let dir = config.cache_dir();
    if !dir.exists() {
        log!("clean"; "nothing to remove");
        return Ok(());
    }
    cache::clear_cache_dir(&dir).with_context(|| format!("failed to remove {}", dir.display()))?;
    log!("clean"; "removed {}", dir.display());
    Ok(())
}
