//! BibTeX parsing and formatting
//!
//! The two ends of the bibtidy pipeline: a parser that turns BibTeX text into
//! an ordered list of entries, and a formatter that writes entries back out.
//!
//! Features:
//! - Nom-based parser with `@string` expansion and error recovery
//! - Braced, quoted, numeric and concatenated field values
//! - Writer with configurable indentation and field display order

mod entry;
mod formatter;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXField};
pub use formatter::{format_entries, format_entry, EntryOrder, WriterOptions};
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError};
