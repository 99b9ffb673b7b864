//! Loosely-typed records, datasets and source metadata.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Group key used for null or empty values.
pub const UNKNOWN: &str = "Unknown";

static NULL: Value = Value::Null;

/// A single raw cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    /// Build a value from a raw delimited-text cell. Blank cells become `Null`.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    /// Returns true for `Null` and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Permissive numeric coercion.
    ///
    /// Text is trimmed and parsed as a float; empty values, non-numeric text
    /// and non-finite results yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            Value::Null => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Numeric coercion where anything unparseable counts as zero.
    pub fn number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Numeric coercion to a whole year, if the value is integral.
    pub fn as_year(&self) -> Option<i64> {
        let n = self.as_number()?;
        (n.fract() == 0.0 && n.abs() < 1e15).then_some(n as i64)
    }

    /// String form used for grouping and equality filters.
    ///
    /// Empty values coerce to `"Unknown"`. Text is not trimmed, so matching
    /// stays exact and case-sensitive.
    pub fn group_key(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(UNKNOWN),
            Value::Text(s) if s.trim().is_empty() => Cow::Borrowed(UNKNOWN),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

/// Integral numbers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One row of tabular data: field name to raw value, in column order.
pub type Record = IndexMap<String, Value>;

/// Look up a field, treating a missing key as `Null`.
pub fn field<'a>(record: &'a Record, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&NULL)
}

/// Metadata about the file a dataset was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// An immutable, ordered collection of records sharing one field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    fields: Vec<String>,
    records: Vec<Record>,
    #[serde(skip)]
    source: Option<SourceMetadata>,
}

impl PartialEq for SourceMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.path == other.path
    }
}

impl Dataset {
    /// Create a dataset with an explicit field order.
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            fields,
            records,
            source: None,
        }
    }

    /// Create a dataset, taking the field order from the records themselves.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut fields: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !fields.iter().any(|f| f == key) {
                    fields.push(key.clone());
                }
            }
        }
        Self::new(fields, records)
    }

    /// Attach metadata about the file this dataset came from.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any record carries the named field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}
