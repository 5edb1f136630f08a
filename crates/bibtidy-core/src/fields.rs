//! Field allowlist and ordering

use bibtidy_bibtex::{BibTeXEntry, BibTeXField};

/// Default field priority; also the default allowlist
pub const DEFAULT_FIELD_ORDER: &[&str] = &[
    "author",
    "title",
    "booktitle",
    "journal",
    "series",
    "volume",
    "number",
    "pages",
    "year",
    "publisher",
    "editor",
    "subtitle",
    "issue",
    "school",
];

/// Which fields survive and in what order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Allowed fields, in output order
    pub order: Vec<String>,
    /// Allowed fields with no fixed position; they trail in input order
    pub extra: Vec<String>,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            order: DEFAULT_FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
            extra: Vec::new(),
        }
    }
}

impl FieldPolicy {
    pub fn is_allowed(&self, key: &str) -> bool {
        self.order
            .iter()
            .chain(self.extra.iter())
            .any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// Drop fields outside the allowlist and put the rest in priority order
///
/// Entry type and cite key live outside the field list and are always kept.
/// Returns the number of fields dropped.
pub fn filter_and_order(entry: &mut BibTeXEntry, policy: &FieldPolicy) -> usize {
    let before = entry.fields.len();
    let mut remaining: Vec<BibTeXField> = std::mem::take(&mut entry.fields)
        .into_iter()
        .filter(|f| policy.is_allowed(&f.key))
        .collect();
    let dropped = before - remaining.len();

    let mut ordered = Vec::with_capacity(remaining.len());
    for key in &policy.order {
        if let Some(pos) = remaining.iter().position(|f| f.key.eq_ignore_ascii_case(key)) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);

    entry.fields = ordered;
    dropped
}
