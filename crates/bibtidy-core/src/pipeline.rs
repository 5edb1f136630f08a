//! Normalization pipeline
//!
//! Parse → per-entry cleanup → key assignment → filter/order → format.
//! Entries are handled one at a time in input order; the only state shared
//! between them is the [`KeyRegistry`] for the run.

use std::path::Path;

use bibtidy_bibtex::{format_entries, parse, BibTeXEntry, ParseError};
use tracing::{debug, info, warn};

use crate::abbreviations::{deabbreviate, LookupTables};
use crate::cite_key::{base_key, KeyRegistry};
use crate::config::BibtidyConfig;
use crate::error::NormalizeError;
use crate::fields::{filter_and_order, FieldPolicy};
use crate::normalize::{drop_article_publisher, fix_field_names, resolve_entry_type};
use crate::title::protect_optional_title;

/// Why an entry was left out of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No entry type marker and no `type` field
    MissingEntryType,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingEntryType => write!(f, "Entry type not standard. Not considered."),
        }
    }
}

/// An entry dropped from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the parsed input
    pub index: usize,
    /// Cite key as it appeared in the input
    pub cite_key: String,
    pub reason: SkipReason,
}

/// Outcome of normalizing a list of entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Normalized entries, in input order
    pub entries: Vec<BibTeXEntry>,
    pub skipped: Vec<SkippedEntry>,
    /// Total fields removed by the allowlist
    pub dropped_fields: usize,
}

/// Read-only settings shared by every entry of a run
#[derive(Debug, Clone, Default)]
pub struct NormalizeContext {
    pub policy: FieldPolicy,
    pub tables: LookupTables,
}

impl NormalizeContext {
    pub fn from_config(config: &BibtidyConfig) -> Self {
        let context = Self {
            policy: config.field_policy(),
            tables: config.lookup_tables(),
        };
        debug!(
            journals = context.tables.journal_count(),
            publishers = context.tables.publisher_count(),
            "loaded lookup tables"
        );
        context
    }
}

/// Normalize one entry, assigning its key through `registry`
///
/// Returns `Err` with the reason when the entry has to be dropped. The
/// second element of the `Ok` tuple is the number of fields filtered out.
pub fn normalize_entry(
    mut entry: BibTeXEntry,
    context: &NormalizeContext,
    registry: &mut KeyRegistry,
) -> Result<(BibTeXEntry, usize), SkipReason> {
    if !resolve_entry_type(&mut entry) {
        return Err(SkipReason::MissingEntryType);
    }

    fix_field_names(&mut entry);
    drop_article_publisher(&mut entry);

    if let Some(protected) = protect_optional_title(entry.title()) {
        entry.set_field("title", protected);
    }

    deabbreviate(&mut entry, &context.tables);

    let original_key = std::mem::take(&mut entry.cite_key);
    entry.cite_key = registry.assign(&entry);
    debug!(from = %original_key, to = %entry.cite_key, "assigned cite key");
    let base = base_key(&entry);
    if registry.count(&base) > 1 {
        debug!(base = %base, key = %entry.cite_key, "cite key collision");
    }

    let dropped = filter_and_order(&mut entry, &context.policy);
    Ok((entry, dropped))
}

/// Normalize every entry in order with one key registry for the whole run
pub fn normalize_entries(entries: Vec<BibTeXEntry>, context: &NormalizeContext) -> NormalizeReport {
    let mut registry = KeyRegistry::new();
    let mut report = NormalizeReport::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let cite_key = entry.cite_key.clone();
        match normalize_entry(entry, context, &mut registry) {
            Ok((normalized, dropped)) => {
                report.dropped_fields += dropped;
                report.entries.push(normalized);
            }
            Err(reason) => {
                warn!(index, cite_key = %cite_key, "{reason}");
                report.skipped.push(SkippedEntry {
                    index,
                    cite_key,
                    reason,
                });
            }
        }
    }

    info!(
        kept = report.entries.len(),
        skipped = report.skipped.len(),
        dropped_fields = report.dropped_fields,
        "normalized bibliography"
    );
    report
}

/// Parse, normalize and format BibTeX text
///
/// Any malformed entry in the input aborts the run.
pub fn reformat_bibtex(
    input: &str,
    config: &BibtidyConfig,
) -> Result<(String, NormalizeReport), NormalizeError> {
    config.validate()?;

    let parsed = parse(input);
    if parsed.has_errors() {
        for err in &parsed.errors {
            warn!(line = err.line, "{}", err.message);
        }
        if let Some(err) = parsed.errors.into_iter().next() {
            return Err(ParseError::from(err).into());
        }
    }
    debug!(
        entries = parsed.entries.len(),
        strings = parsed.strings.len(),
        "parsed input"
    );

    let context = NormalizeContext::from_config(config);
    let report = normalize_entries(parsed.entries, &context);
    let output = format_entries(&report.entries, &config.writer_options());
    Ok((output, report))
}

/// Reformat a BibTeX file into `output`
pub fn reformat_bibtex_file(
    input: &Path,
    output: &Path,
    config: &BibtidyConfig,
) -> Result<NormalizeReport, NormalizeError> {
    info!("Loading bibliography from {:?}", input);
    let text = std::fs::read_to_string(input).map_err(|e| NormalizeError::io(input, e))?;

    let (formatted, report) = reformat_bibtex(&text, config)?;

    std::fs::write(output, formatted).map_err(|e| NormalizeError::io(output, e))?;
    info!("Wrote {} entries to {:?}", report.entries.len(), output);
    Ok(report)
}
