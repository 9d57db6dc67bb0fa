use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::Serialize;

const GENRE_BLACKLIST: &[&str] = &["", "delete", "delete?", "delete!?", "selecteer genres..."];

// Keys are lower-case raw tokens; every label's own lower-case form is also a key.
const GENRE_TABLE: &[(&str, &str)] = &[
    ("action", "Action"),
    ("adventure", "Adventure"),
    ("action & adventure", "Action & Adventure"),
    ("action-adventure", "Action & Adventure"),
    ("animation", "Animation"),
    ("animated", "Animation"),
    ("anime", "Anime"),
    ("donghua", "Donghua"),
    ("biography", "Biography"),
    ("biopic", "Biography"),
    ("children", "Kids"),
    ("kids", "Kids"),
    ("comedy", "Comedy"),
    ("sitcom", "Comedy"),
    ("crime", "Crime"),
    ("true crime", "True Crime"),
    ("true-crime", "True Crime"),
    ("documentary", "Documentary"),
    ("docuseries", "Documentary"),
    ("drama", "Drama"),
    ("family", "Family"),
    ("fantasy", "Fantasy"),
    ("film noir", "Film Noir"),
    ("film-noir", "Film Noir"),
    ("game show", "Game Show"),
    ("game-show", "Game Show"),
    ("history", "History"),
    ("historical", "History"),
    ("home & garden", "Home & Garden"),
    ("home-and-garden", "Home & Garden"),
    ("horror", "Horror"),
    ("legal", "Legal"),
    ("lawyer", "Legal"),
    ("lawyers", "Legal"),
    ("doctor", "Medical"),
    ("doctors", "Medical"),
    ("medical", "Medical"),
    ("mini-series", "Mini-Series"),
    ("miniseries", "Mini-Series"),
    ("music", "Music"),
    ("musical", "Musical"),
    ("mystery", "Mystery"),
    ("news", "News"),
    ("politics", "Politics"),
    ("political", "Politics"),
    ("reality", "Reality"),
    ("reality-tv", "Reality"),
    ("romance", "Romance"),
    ("romantic", "Romance"),
    ("sci-fi", "Sci-Fi"),
    ("scifi", "Sci-Fi"),
    ("sci fi", "Sci-Fi"),
    ("science-fiction", "Sci-Fi"),
    ("science fiction", "Sci-Fi"),
    ("sci-fi & fantasy", "Sci-Fi & Fantasy"),
    ("soap", "Soap"),
    ("special interest", "Special Interest"),
    ("special-interest", "Special Interest"),
    ("sport", "Sport"),
    ("sports", "Sport"),
    ("sporting-event", "Sport"),
    ("superhero", "Superhero"),
    ("superheroes", "Superhero"),
    ("suspense", "Suspense"),
    ("talk show", "Talk Show"),
    ("talk-show", "Talk Show"),
    ("thriller", "Thriller"),
    ("tv movie", "TV Movie"),
    ("tv-movie", "TV Movie"),
    ("war", "War"),
    ("war & politics", "War & Politics"),
    ("western", "Western"),
    ("avontuur", "Adventure"),
    ("documentaire", "Documentary"),
    ("familie", "Family"),
    ("geschiedenis", "History"),
    ("komedie", "Comedy"),
    ("misdaad", "Crime"),
    ("muziek", "Music"),
    ("oorlog", "War"),
    ("romantiek", "Romance"),
];

static CANONICAL_GENRES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| GENRE_TABLE.iter().copied().collect());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct GenreSet(Vec<String>);

impl GenreSet {
    #[cfg(test)]
    pub(crate) fn labels(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn joined(&self) -> String {
        self.0.join(", ")
    }
}

pub(crate) fn is_blacklisted(token: &str) -> bool {
    GENRE_BLACKLIST.contains(&token)
}

pub(crate) fn canonical_genre(token: &str) -> Option<String> {
    let trimmed = token.trim();
    let key = trimmed.to_lowercase();
    if is_blacklisted(&key) {
        return None;
    }
    Some(match CANONICAL_GENRES.get(key.as_str()) {
        Some(label) => (*label).to_string(),
        None => title_case(trimmed),
    })
}

pub(crate) fn normalize_genres(raw: &str) -> GenreSet {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for token in raw.split(',') {
        let Some(label) = canonical_genre(token) else {
            continue;
        };
        if seen.insert(label.clone()) {
            labels.push(label);
        }
    }
    GenreSet(labels)
}

// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub(crate) fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                // Multi-char expansions (`ß` -> `SS`) keep only the first letter upper-case.
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                for rest in upper {
                    out.extend(rest.to_lowercase());
                }
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn genre_table() -> &'static [(&'static str, &'static str)] {
    GENRE_TABLE
}
