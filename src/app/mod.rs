pub(crate) mod poster;
pub(crate) mod progress;
mod render;
mod snapshot;


use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::Snapshot;

use self::poster::{PosterLookup, TmdbPosterLookup};
use self::progress::{EnrichedRecord, enrich_and_sort};
use self::render::render_cards;
use self::snapshot::SnapshotFetcher;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Card {
    #[serde(flatten)]
    pub(crate) record: EnrichedRecord,
    pub(crate) poster_url: Option<String>,
}

pub(crate) struct Dashboard<P> {
    fetcher: SnapshotFetcher,
    posters: P,
}

impl<P: PosterLookup> Dashboard<P> {
    pub(crate) fn new(fetcher: SnapshotFetcher, posters: P) -> Self {
        Self { fetcher, posters }
    }

    pub(crate) fn search(&mut self, term: &str) -> Result<Vec<Card>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let path = self.fetcher.ensure_local()?;
        let snapshot = Snapshot::open(&path)?;
        let raws = snapshot
            .search_by_name(term)
            .with_context(|| format!("failed to search snapshot for `{term}`"))?;
        info!(term, matches = raws.len(), "snapshot search finished");

        let records = enrich_and_sort(raws, |series, err| {
            debug!(series, "skipped season tally segment: {err}");
        });

        let cards = records
            .into_iter()
            .map(|record| {
                let poster_url = self.posters.lookup_poster(record.raw.external_id.as_deref());
                Card { record, poster_url }
            })
            .collect();
        Ok(cards)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::from_args(&cli.source)?;
    let fetcher = SnapshotFetcher::new(&config);
    debug!(path = %fetcher.path().display(), "snapshot location");
    let mut dashboard = Dashboard::new(fetcher, TmdbPosterLookup::new(&config));

    match cli.command {
        Some(Command::Search { term, json }) => run_search(&mut dashboard, &term, json)?,
        Some(Command::Interactive) | None => run_interactive(&mut dashboard)?,
    }

    Ok(())
}

fn run_search<P: PosterLookup>(dashboard: &mut Dashboard<P>, term: &str, json: bool) -> Result<()> {
    let cards = dashboard.search(term)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    print_cards(&cards);
    Ok(())
}

fn run_interactive<P: PosterLookup>(dashboard: &mut Dashboard<P>) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("Search a series (part of the name, empty to quit): ");
        io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("failed to read search term")?;
        let term = line.trim();
        if read == 0 || term.is_empty() {
            break;
        }

        match dashboard.search(term) {
            Ok(cards) => print_cards(&cards),
            Err(err) => eprintln!("Search failed: {err:#}"),
        }
    }
    Ok(())
}

fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No results found.");
        return;
    }
    println!("{}", render_cards(cards, io::stdout().is_terminal()));
}
