use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::config::Config;
use crate::http::get_bytes;

const SQLITE_MAGIC: &[u8] = b"SQLite format 3\0";

#[derive(Debug)]
pub(crate) struct SnapshotFetcher {
    url: String,
    path: PathBuf,
    ttl: Duration,
    timeout: Duration,
    force_refresh: bool,
}

impl SnapshotFetcher {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            url: config.db_url.clone(),
            path: config.snapshot_path.clone(),
            ttl: config.snapshot_ttl,
            timeout: config.fetch_timeout,
            force_refresh: config.force_refresh,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn ensure_local(&mut self) -> Result<PathBuf> {
        self.ensure_local_at(SystemTime::now())
    }

    pub(crate) fn ensure_local_at(&mut self, now: SystemTime) -> Result<PathBuf> {
        if !self.force_refresh && is_fresh(&self.path, self.ttl, now) {
            debug!(path = %self.path.display(), "using cached snapshot");
            return Ok(self.path.clone());
        }

        self.download()?;
        // Only the first lookup of a session bypasses the cache.
        self.force_refresh = false;
        Ok(self.path.clone())
    }

    fn download(&self) -> Result<()> {
        info!(url = %self.url, "downloading snapshot");
        let body = get_bytes(&self.url, &[], self.timeout)
            .map_err(|err| anyhow!("snapshot download failed: {err}"))?;
        if !body.starts_with(SQLITE_MAGIC) {
            return Err(anyhow!(
                "snapshot download failed: response is not a SQLite database ({} bytes)",
                body.len()
            ));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create snapshot directory {}", parent.display())
            })?;
        }
        let partial = self.path.with_extension("db.part");
        if let Err(err) = fs::write(&partial, &body).and_then(|()| fs::rename(&partial, &self.path)) {
            let _ = fs::remove_file(&partial);
            return Err(err)
                .with_context(|| format!("failed to store snapshot at {}", self.path.display()));
        }
        debug!(bytes = body.len(), path = %self.path.display(), "snapshot stored");
        Ok(())
    }
}

pub(crate) fn is_fresh(path: &Path, ttl: Duration, now: SystemTime) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|meta| meta.modified()) else {
        return false;
    };
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        // Modified in the future (clock skew): treat as just written.
        Err(_) => true,
    }
}
