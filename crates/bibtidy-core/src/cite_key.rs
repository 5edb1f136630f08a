//! Citation key generation
//!
//! Keys are built from the initials of every author's last name followed by
//! the last two characters of the year, e.g. `Smith, John and Doe, Jane` in
//! 2023 gives `SD23`. Repeats within one run get a letter suffix.

use bibtidy_bibtex::BibTeXEntry;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Placeholder used when the author field is missing
pub const NO_AUTHOR: &str = "X";
/// Placeholder used when the year is missing or too short
pub const NO_YEAR: &str = "XX";

lazy_static! {
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\s+and\s+").unwrap();
    static ref SURNAME_PARTS: Regex = Regex::new(r"[\s\-]+").unwrap();
}

/// Initials of every author's last name, in order
///
/// Names in `Last, First` form use the text before the first comma; otherwise
/// the final word is the last name. Compound surnames (`Garcia-Lopez`,
/// `{van Dyke}, Dick`) contribute one initial per part.
pub fn author_initials(author_field: &str) -> String {
    let mut initials = String::new();

    for author in AUTHOR_SEPARATOR.split(author_field) {
        let author = author.replace(|c: char| c == '{' || c == '}', "");
        let author = author.trim();

        let last_name = match author.split_once(',') {
            Some((last, _)) => last.trim(),
            None => author.split_whitespace().last().unwrap_or(""),
        };

        for part in SURNAME_PARTS.split(last_name) {
            if let Some(first) = part.chars().next() {
                initials.extend(first.to_uppercase());
            }
        }
    }

    initials
}

/// Last two characters of the year, or [`NO_YEAR`]
pub fn year_digits(year: &str) -> String {
    let chars: Vec<char> = year.chars().collect();
    if chars.len() >= 2 {
        chars[chars.len() - 2..].iter().collect()
    } else {
        NO_YEAR.to_string()
    }
}

/// Key candidate before collision resolution
pub fn base_key(entry: &BibTeXEntry) -> String {
    let initials = match entry.author() {
        Some(author) if !author.is_empty() => author_initials(author),
        _ => NO_AUTHOR.to_string(),
    };
    let year = entry.year().map(year_digits).unwrap_or_else(|| NO_YEAR.to_string());
    format!("{initials}{year}")
}

/// Letter suffix for the n-th repeat of a key (1 → `a`, 26 → `z`, 27 → `aa`)
pub fn collision_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Run-scoped collision counter
///
/// Counts how often each base key has been requested. The first request gets
/// the bare key, later ones get `a`, `b`, ... appended.
#[derive(Debug, Default, Clone)]
pub struct KeyRegistry {
    counts: HashMap<String, usize>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a base key to a unique key and record the request
    pub fn resolve(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        let previous = *count;
        *count += 1;

        if previous == 0 {
            base.to_string()
        } else {
            format!("{base}{}", collision_suffix(previous))
        }
    }

    /// Generate the key for an entry
    pub fn assign(&mut self, entry: &BibTeXEntry) -> String {
        self.resolve(&base_key(entry))
    }

    /// How many times a base key has been requested
    pub fn count(&self, base: &str) -> usize {
        self.counts.get(base).copied().unwrap_or(0)
    }
}
