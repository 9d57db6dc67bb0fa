use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_DB_URL: &str = "https://www.dropbox.com/scl/fi/bjy95x305s1r2fvgiddcv/Trakt_DBase.db?rlkey=kxev7chehu2mnvmag0ojt9n4g&raw=1";

#[derive(Debug, Parser)]
#[command(
    name = "trakt-progress",
    version,
    about = "Search a shared Trakt snapshot and show series watch progress"
)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log diagnostics (skipped tally segments, cache hits) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// URL of the shared snapshot database
    #[arg(long, default_value = DEFAULT_DB_URL, global = true)]
    pub db_url: String,

    /// Directory holding the downloaded snapshot
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Download a fresh snapshot even if the cached one has not expired
    #[arg(long, global = true)]
    pub refresh: bool,

    /// TMDB API key used for poster artwork
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    pub tmdb_api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search once and print the matching series
    Search {
        /// Part of the series name
        term: String,
        /// Print cards as JSON instead of styled text
        #[arg(long)]
        json: bool,
    },
    /// Prompt for search terms until an empty line
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn only_the_tmdb_key_reads_the_environment() {
        let command = Cli::command();
        let with_env = command
            .get_arguments()
            .filter(|arg| arg.get_env().is_some())
            .map(|arg| arg.get_id().to_string())
            .collect::<Vec<_>>();
        assert_eq!(with_env, vec!["tmdb_api_key".to_string()]);
    }

    #[test]
    fn source_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from([
            "trakt-progress",
            "--db-url",
            "http://127.0.0.1/snap.db",
            "search",
            "bear",
            "--cache-dir",
            "/tmp/tp",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.source.db_url, "http://127.0.0.1/snap.db");
        assert_eq!(cli.source.cache_dir, Some(PathBuf::from("/tmp/tp")));
        assert!(matches!(
            cli.command,
            Some(Command::Search { ref term, json: false }) if term == "bear"
        ));
    }
}
