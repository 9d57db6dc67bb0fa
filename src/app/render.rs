use crossterm::style::{Color, Stylize};

use super::Card;
use super::progress::{PointerOrigin, ViewStatus, parse_timestamp};

const GAUGE_CELLS: usize = 20;
const PLOT_PREVIEW_CHARS: usize = 160;

pub(crate) fn render_cards(cards: &[Card], styled: bool) -> String {
    cards
        .iter()
        .map(|card| render_card(card, styled))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_card(card: &Card, styled: bool) -> String {
    let record = &card.record;
    let raw = &record.raw;
    let mut lines = Vec::new();

    let title = match raw.year {
        Some(year) => format!("{} ({year})", raw.name),
        None => raw.name.clone(),
    };
    lines.push(paint(&title, Color::White, true, styled));

    let status = record.status;
    lines.push(format!(
        "  {} {}",
        paint("●", status_color(status), false, styled),
        paint(status.label(), status_color(status), true, styled)
    ));

    let pointer_line = match (record.pointer.origin, record.pointer.position()) {
        (PointerOrigin::Parsed, Some((season, episode))) => {
            let when = record
                .pointer
                .watched_at
                .as_deref()
                .map(format_timestamp_display)
                .unwrap_or_default();
            format!("  Last watched: Season {season} · Episode {episode}   {when}")
        }
        (PointerOrigin::Unparseable, _) => "  Progress unknown".to_string(),
        _ => "  Not started".to_string(),
    };
    lines.push(pointer_line.trim_end().to_string());

    let tally = &record.tally;
    lines.push(format!(
        "  {} {:.1}%   {} / {} episodes",
        build_gauge(tally.percentage),
        tally.percentage,
        tally.watched,
        tally.total
    ));

    if !record.genres.is_empty() {
        lines.push(format!("  Genres: {}", record.genres.joined()));
    }
    if let Some(plot) = raw.plot.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        lines.push(format!("  {}", truncate(plot, PLOT_PREVIEW_CHARS)));
    }

    let mut meta = Vec::new();
    if let Some(view_status) = raw.stored_view_status.as_deref() {
        meta.push(format!("View status: {view_status}"));
    }
    if let Some(rating) = raw.rating.as_deref() {
        meta.push(format!("Rating: {rating}"));
    }
    if let Some(updated) = raw.updated.as_deref() {
        meta.push(format!("Updated: {}", format_timestamp_display(updated)));
    }
    if !meta.is_empty() {
        lines.push(format!("  {}", meta.join("   ")));
    }

    if let Some(poster) = card.poster_url.as_deref() {
        lines.push(format!("  Poster: {poster}"));
    }

    lines.join("\n") + "\n"
}

fn status_color(status: ViewStatus) -> Color {
    match status {
        ViewStatus::Watching => Color::Green,
        ViewStatus::NotStarted => Color::Yellow,
        ViewStatus::Completed => Color::Blue,
    }
}

fn paint(text: &str, color: Color, bold: bool, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }
    if bold {
        text.with(color).bold().to_string()
    } else {
        text.with(color).to_string()
    }
}

pub(crate) fn build_gauge(percentage: f64) -> String {
    let ratio = (percentage / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * GAUGE_CELLS as f64).round() as usize).min(GAUGE_CELLS);
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(GAUGE_CELLS - filled)
    )
}

pub(crate) fn format_timestamp_display(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
