//! BibTeX entry data structures

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry
///
/// Fields keep their input order. Lookups by key are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    /// Entry type as written after `@`, or `None` when the marker was empty
    pub entry_type: Option<String>,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    /// Create a new BibTeX entry
    pub fn new(cite_key: impl Into<String>, entry_type: Option<String>) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Entry type, or an empty string when absent
    pub fn entry_type_str(&self) -> &str {
        self.entry_type.as_deref().unwrap_or("")
    }

    /// Add a field to the entry
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.fields[i].value.as_str())
    }

    /// Whether a field with this key exists (case-insensitive)
    pub fn has_field(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set a field, replacing the value in place if the key already exists
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.fields[i].value = value.into(),
            None => self.add_field(key, value),
        }
    }

    /// Remove a field and return its value
    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.fields.remove(i).value)
    }

    /// Move the value of `from` into `to`, overwriting any existing `to` value
    ///
    /// Returns `true` if `from` was present.
    pub fn rename_field(&mut self, from: &str, to: &str) -> bool {
        match self.remove_field(from) {
            Some(value) => {
                self.set_field(to, value);
                true
            }
            None => false,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.key.eq_ignore_ascii_case(key))
    }

    /// Get the title field
    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    /// Get the author field
    pub fn author(&self) -> Option<&str> {
        self.get_field("author")
    }

    /// Get the year field
    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }

    /// Get the journal field
    pub fn journal(&self) -> Option<&str> {
        self.get_field("journal")
    }

    /// Get the publisher field
    pub fn publisher(&self) -> Option<&str> {
        self.get_field("publisher")
    }
}
