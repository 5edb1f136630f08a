//! Journal and publisher deabbreviation
//!
//! Expands known abbreviated journal and publisher names to their full form.
//! Matching is exact and case-sensitive; anything not in the tables is left
//! untouched.

use bibtidy_bibtex::BibTeXEntry;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Built-in journal expansions.
    static ref JOURNALS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        // Physical Review
        m.insert("Phys. Rev. A", "Physical Review A");
        m.insert("Phys. Rev. Lett.", "Physical Review Letters");
        m.insert("Physical Review Letters", "Physical Review Letters");

        // Statistical physics
        m.insert("J. Stat. Phys.", "Journal of Statistical Physics");
        m.insert("J Stat Phys", "Journal of Statistical Physics");
        m.insert("Europhysics Letters", "Europhysics Letters");
        m.insert("Physica D: Nonlinear Phenomena", "Physica D: Nonlinear Phenomena");

        // Mathematics and numerics
        m.insert("Arch Rational Mech Anal", "Archive for Rational Mechanics and Analysis");
        m.insert("BIT Numerical Mathematics", "BIT Numerical Mathematics");
        m.insert("IMA J. Numer. Anal.", "IMA Journal of Numerical Analysis");

        // Condensed matter and materials
        m.insert("Nanotechnology", "Nanotechnology");
        m.insert("Advances in Physics", "Advances in Physics");
        m.insert(
            "Current Opinion in Solid State and Materials Science",
            "Current Opinion in Solid State and Materials Science",
        );
        m.insert("J. Phys. C: Solid State Phys.", "Journal of Physics C: Solid State Physics");

        // Society journals
        m.insert("New J. Phys.", "New Journal of Physics");
        m.insert("J. Phys. Soc. Jpn.", "Journal of the Physical Society of Japan");

        m
    };

    /// Built-in publisher expansions.
    static ref PUBLISHERS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        m.insert("APS", "American Physical Society");
        m.insert("Springer", "Springer");
        m.insert("Springer International Publishing", "Springer International Publishing");
        m.insert("Elsevier", "Elsevier");
        m.insert("John Wiley \\& Sons", "John Wiley & Sons");
        m.insert("Oxford University Press", "Oxford University Press");
        m.insert("Cambridge University Press", "Cambridge University Press");
        m.insert("AIP Publishing", "AIP Publishing");
        m.insert("ACS Publications", "ACS Publications");

        m
    };
}

/// Lookup tables for one run
///
/// Built once from the static tables plus any configured additions and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables {
    journals: HashMap<String, String>,
    publishers: HashMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self {
            journals: to_owned_map(&JOURNALS),
            publishers: to_owned_map(&PUBLISHERS),
        }
    }
}

fn to_owned_map(table: &HashMap<&'static str, &'static str>) -> HashMap<String, String> {
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl LookupTables {
    /// Built-in tables extended with extra entries; extras win on conflict
    pub fn with_additions(
        journals: &HashMap<String, String>,
        publishers: &HashMap<String, String>,
    ) -> Self {
        let mut tables = Self::default();
        tables
            .journals
            .extend(journals.iter().map(|(k, v)| (k.clone(), v.clone())));
        tables
            .publishers
            .extend(publishers.iter().map(|(k, v)| (k.clone(), v.clone())));
        tables
    }

    /// Expand a journal name, or `None` if it is not in the table
    pub fn expand_journal(&self, value: &str) -> Option<&str> {
        self.journals.get(value).map(String::as_str)
    }

    /// Expand a publisher name, or `None` if it is not in the table
    pub fn expand_publisher(&self, value: &str) -> Option<&str> {
        self.publishers.get(value).map(String::as_str)
    }

    pub fn journal_count(&self) -> usize {
        self.journals.len()
    }

    pub fn publisher_count(&self) -> usize {
        self.publishers.len()
    }
}

/// Replace `journal` and `publisher` with their expansions where known
pub fn deabbreviate(entry: &mut BibTeXEntry, tables: &LookupTables) {
    if let Some(full) = entry.journal().and_then(|j| tables.expand_journal(j)) {
        let full = full.to_string();
        entry.set_field("journal", full);
    }
    if let Some(full) = entry.publisher().and_then(|p| tables.expand_publisher(p)) {
        let full = full.to_string();
        entry.set_field("publisher", full);
    }
}
