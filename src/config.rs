use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::cli::SourceArgs;
use crate::paths::{SNAPSHOT_FILE_NAME, default_cache_dir};

pub const SNAPSHOT_TTL: Duration = Duration::from_secs(10 * 60);
pub const POSTER_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const POSTER_TIMEOUT: Duration = Duration::from_secs(10);
pub const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w342";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub snapshot_path: PathBuf,
    pub snapshot_ttl: Duration,
    pub fetch_timeout: Duration,
    pub force_refresh: bool,
    pub tmdb_api_key: Option<String>,
    pub tmdb_api_base: String,
    pub poster_ttl: Duration,
    pub poster_timeout: Duration,
}

impl Config {
    pub fn from_args(args: &SourceArgs) -> Result<Self> {
        let cache_dir = match &args.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir()?,
        };
        let tmdb_api_key = args
            .tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        Ok(Self {
            db_url: args.db_url.clone(),
            snapshot_path: cache_dir.join(SNAPSHOT_FILE_NAME),
            snapshot_ttl: SNAPSHOT_TTL,
            fetch_timeout: FETCH_TIMEOUT,
            force_refresh: args.refresh,
            tmdb_api_key,
            tmdb_api_base: TMDB_API_BASE.to_string(),
            poster_ttl: POSTER_TTL,
            poster_timeout: POSTER_TIMEOUT,
        })
    }
}
