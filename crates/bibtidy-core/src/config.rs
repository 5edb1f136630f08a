//! Configuration for bibtidy
//!
//! Every setting has a built-in default, so an empty (or absent) config file
//! reproduces the standard normalization. A TOML file can replace the field
//! order, allow extra fields, add journal/publisher expansions and tweak the
//! writer.
//!
//! ```toml
//! field_order = ["author", "title", "journal", "year"]
//! extra_fields = ["doi"]
//! indent = "    "
//!
//! [journals]
//! "Nat. Phys." = "Nature Physics"
//!
//! [publishers]
//! "CUP" = "Cambridge University Press"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use bibtidy_bibtex::{EntryOrder, WriterOptions};
use serde::{Deserialize, Serialize};

use crate::abbreviations::LookupTables;
use crate::fields::{FieldPolicy, DEFAULT_FIELD_ORDER};

/// Name of the directory under the user config dir
const CONFIG_DIR_NAME: &str = "bibtidy";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibtidyConfig {
    /// Allowed fields in output order
    pub field_order: Vec<String>,
    /// Additional allowed fields, written after the ordered ones
    pub extra_fields: Vec<String>,
    /// Field indentation in the output
    pub indent: String,
    /// Sort output entries by cite key instead of keeping input order
    pub sort_entries: bool,
    /// Journal expansions added to the built-in table
    pub journals: HashMap<String, String>,
    /// Publisher expansions added to the built-in table
    pub publishers: HashMap<String, String>,
}

impl Default for BibtidyConfig {
    fn default() -> Self {
        Self {
            field_order: DEFAULT_FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
            extra_fields: Vec::new(),
            indent: "  ".to_string(),
            sort_entries: false,
            journals: HashMap::new(),
            publishers: HashMap::new(),
        }
    }
}

impl BibtidyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Default location of the user config file, if a config dir is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, the user config file is used
    /// when present and the defaults otherwise.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_order.is_empty() {
            return Err(ConfigError::EmptyFieldOrder);
        }

        let mut seen = HashSet::new();
        for field in self.field_order.iter().chain(self.extra_fields.iter()) {
            if field.trim().is_empty() {
                return Err(ConfigError::InvalidField(field.clone()));
            }
            if !seen.insert(field.to_lowercase()) {
                return Err(ConfigError::DuplicateField(field.clone()));
            }
        }

        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::InvalidIndent(self.indent.clone()));
        }

        Ok(())
    }

    /// Field allowlist and order for the filter stage
    pub fn field_policy(&self) -> FieldPolicy {
        FieldPolicy {
            order: lowercase_all(&self.field_order),
            extra: lowercase_all(&self.extra_fields),
        }
    }

    /// Lookup tables for the deabbreviation stage
    pub fn lookup_tables(&self) -> LookupTables {
        LookupTables::with_additions(&self.journals, &self.publishers)
    }

    /// Writer settings for the output stage
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            indent: self.indent.clone(),
            order_entries_by: if self.sort_entries {
                EntryOrder::CiteKey
            } else {
                EntryOrder::Input
            },
            ..WriterOptions::with_display_order(lowercase_all(&self.field_order))
        }
    }
}

fn lowercase_all(fields: &[String]) -> Vec<String> {
    fields.iter().map(|f| f.to_lowercase()).collect()
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config syntax: {0}")]
    Syntax(String),
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
    #[error("field_order must not be empty")]
    EmptyFieldOrder,
    #[error("Invalid field name: {0:?}")]
    InvalidField(String),
    #[error("Field listed more than once: {0}")]
    DuplicateField(String),
    #[error("Indent must be spaces or tabs: {0:?}")]
    InvalidIndent(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Syntax(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}
