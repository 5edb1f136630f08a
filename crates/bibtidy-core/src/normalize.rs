//! Field-level cleanup of a single entry
//!
//! Renames misspelled or biblatex-style fields to their BibTeX names, trims
//! values and settles the entry type.

use bibtidy_bibtex::BibTeXEntry;

/// Fields moved to a new name; an existing target value is overwritten
const RENAMES: &[(&str, &str)] = &[
    ("journaltitle", "journal"),
    ("data", "year"),
    ("adress", "address"),
];

/// Fields removed outright
const DROPPED: &[&str] = &["shortjournal"];

/// Field consulted when the entry type marker is missing
const TYPE_FALLBACK_FIELD: &str = "type";

/// Make sure the entry has an entry type and lower-case it
///
/// A missing type is taken from the `type` field, which is removed. Returns
/// `false` when neither is present; such an entry cannot be kept.
pub fn resolve_entry_type(entry: &mut BibTeXEntry) -> bool {
    let entry_type = match entry.entry_type.take() {
        Some(t) if !t.trim().is_empty() => t,
        _ => match entry.remove_field(TYPE_FALLBACK_FIELD) {
            Some(t) if !t.trim().is_empty() => t,
            _ => return false,
        },
    };

    entry.entry_type = Some(entry_type.trim().to_lowercase());
    true
}

/// Apply field renames and clean every value
pub fn fix_field_names(entry: &mut BibTeXEntry) {
    for (from, to) in RENAMES {
        entry.rename_field(from, to);
    }
    for key in DROPPED {
        entry.remove_field(key);
    }
    for field in &mut entry.fields {
        field.value = clean_value(&field.value);
    }
}

/// Trim surrounding whitespace, then any trailing commas
pub fn clean_value(value: &str) -> String {
    value.trim().trim_end_matches(',').to_string()
}

/// Articles cite journals, not publishers
///
/// Returns `true` if a publisher field was removed.
pub fn drop_article_publisher(entry: &mut BibTeXEntry) -> bool {
    entry.entry_type.as_deref() == Some("article") && entry.remove_field("publisher").is_some()
}
