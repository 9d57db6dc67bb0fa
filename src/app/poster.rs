use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::{Config, TMDB_IMAGE_BASE};
use crate::http::get_text;

pub(crate) trait PosterLookup {
    fn lookup_poster(&mut self, external_id: Option<&str>) -> Option<String>;
}

#[derive(Debug)]
pub(crate) struct TmdbPosterLookup {
    api_base: String,
    api_key: Option<String>,
    timeout: Duration,
    cache: TtlCache<String, Option<String>>,
}

impl TmdbPosterLookup {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            api_base: config.tmdb_api_base.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
            timeout: config.poster_timeout,
            cache: TtlCache::new(config.poster_ttl),
        }
    }

    fn fetch(&self, api_key: &str, external_id: &str) -> Result<Option<String>, String> {
        let url = format!("{}/find/{}", self.api_base, external_id);
        let query = [("external_source", "imdb_id"), ("api_key", api_key)];
        get_text(&url, &query, self.timeout).map(|raw| parse_find_poster(&raw))
    }
}

impl PosterLookup for TmdbPosterLookup {
    fn lookup_poster(&mut self, external_id: Option<&str>) -> Option<String> {
        let external_id = external_id.map(str::trim).filter(|id| !id.is_empty())?;
        let api_key = self.api_key.clone()?;

        let key = external_id.to_string();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        // Only answers from the service are cached; failed requests are retried on the next lookup.
        match self.fetch(&api_key, external_id) {
            Ok(poster) => {
                self.cache.insert(key, poster.clone());
                poster
            }
            Err(err) => {
                debug!(external_id, error = %err, "poster lookup failed");
                None
            }
        }
    }
}

pub(crate) fn parse_find_poster(raw: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    ["tv_results", "movie_results"].iter().find_map(|field| {
        parsed
            .get(*field)?
            .as_array()?
            .iter()
            .filter_map(|item| item.get("poster_path")?.as_str())
            .map(str::trim)
            .find(|path| !path.is_empty())
            .map(|path| format!("{TMDB_IMAGE_BASE}{path}"))
    })
}
