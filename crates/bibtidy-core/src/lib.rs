//! Bibliography normalization
//!
//! Takes parsed BibTeX entries and produces a tidy, consistent bibliography:
//! - Field renames (`journaltitle`, `adress`, ...) and value cleanup
//! - Capital-letter protection in titles
//! - Journal and publisher deabbreviation from lookup tables
//! - Citation keys from author initials and year, unique within a run
//! - Field allowlist and fixed field order
//!
//! [`reformat_bibtex`] runs the whole pipeline on a string;
//! [`reformat_bibtex_file`] does the same between two files.

pub mod abbreviations;
pub mod cite_key;
pub mod config;
mod error;
pub mod fields;
pub mod normalize;
pub mod pipeline;
pub mod title;

pub use abbreviations::{deabbreviate, LookupTables};
pub use cite_key::{author_initials, base_key, year_digits, KeyRegistry};
pub use config::{BibtidyConfig, ConfigError};
pub use error::NormalizeError;
pub use fields::{filter_and_order, FieldPolicy, DEFAULT_FIELD_ORDER};
pub use normalize::{drop_article_publisher, fix_field_names, resolve_entry_type};
pub use pipeline::{
    normalize_entries, normalize_entry, reformat_bibtex, reformat_bibtex_file, NormalizeContext,
    NormalizeReport, SkipReason, SkippedEntry,
};
pub use title::protect_title_capitals;

// Re-export the entry model so callers need only this crate
pub use bibtidy_bibtex::{BibTeXEntry, BibTeXField};
