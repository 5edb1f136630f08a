//! BibTeX formatting module
//!
//! Converts BibTeXEntry structures back to BibTeX string format.

use super::entry::{BibTeXEntry, BibTeXField};

/// How entries are ordered in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Keep the input order
    #[default]
    Input,
    /// Sort by cite key
    CiteKey,
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Indentation placed before each field
    pub indent: String,
    /// Fields written first, in this order; the rest follow alphabetically
    pub display_order: Vec<String>,
    pub order_entries_by: EntryOrder,
    /// Write a comma after the last field
    pub trailing_comma: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            display_order: Vec::new(),
            order_entries_by: EntryOrder::Input,
            trailing_comma: false,
        }
    }
}

impl WriterOptions {
    /// Options with the given display order and default everything else
    pub fn with_display_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            display_order: order.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &BibTeXEntry, options: &WriterOptions) -> String {
    let mut result = String::new();

    // Entry type and cite key
    result.push('@');
    result.push_str(entry.entry_type_str());
    result.push('{');
    result.push_str(&entry.cite_key);

    // Fields
    let fields = display_fields(entry, &options.display_order);
    for field in &fields {
        result.push_str(",\n");
        result.push_str(&options.indent);
        result.push_str(&field.key);
        result.push_str(" = ");
        result.push_str(&format_field_value(&field.value));
    }
    if options.trailing_comma && !fields.is_empty() {
        result.push(',');
    }

    result.push_str("\n}\n");
    result
}

/// Format multiple entries to a single BibTeX string
///
/// Entries are separated by a blank line.
pub fn format_entries(entries: &[BibTeXEntry], options: &WriterOptions) -> String {
    let mut ordered: Vec<&BibTeXEntry> = entries.iter().collect();
    if options.order_entries_by == EntryOrder::CiteKey {
        ordered.sort_by(|a, b| a.cite_key.cmp(&b.cite_key));
    }

    ordered
        .into_iter()
        .map(|entry| format_entry(entry, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fields in display order: listed keys first, then the rest sorted by key
fn display_fields<'a>(entry: &'a BibTeXEntry, display_order: &[String]) -> Vec<&'a BibTeXField> {
    let mut listed = Vec::with_capacity(entry.fields.len());
    for key in display_order {
        if let Some(field) = entry.fields.iter().find(|f| f.key.eq_ignore_ascii_case(key)) {
            listed.push(field);
        }
    }

    let mut rest: Vec<&BibTeXField> = entry
        .fields
        .iter()
        .filter(|f| !display_order.iter().any(|k| k.eq_ignore_ascii_case(&f.key)))
        .collect();
    rest.sort_by(|a, b| a.key.cmp(&b.key));

    listed.extend(rest);
    listed
}

/// Format a field value
///
/// Values are always braced; this keeps LaTeX commands and case-protection
/// groups intact.
fn format_field_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}
