use std::path::PathBuf;

use anyhow::{Context, Result};

pub const SNAPSHOT_FILE_NAME: &str = "Trakt_DBase.db";

pub fn default_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("unable to resolve cache directory")?;
    Ok(base.join("trakt-progress"))
}
