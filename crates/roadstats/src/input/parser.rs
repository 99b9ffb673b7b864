//! Delimited text loader with delimiter detection.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::source::{Dataset, Record, SourceMetadata, Value};
use crate::error::{Result, RoadstatsError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions handled by other collaborators (workbook readers, map renderers).
const UNSUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "geojson", "json"];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited text files into datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a file into a dataset with source metadata attached.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_ascii_lowercase();
            if UNSUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                return Err(RoadstatsError::UnsupportedFormat(format!(
                    "'.{}' files are not delimited text",
                    ext
                )));
            }
        }

        let io_err = |e| RoadstatsError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let dataset = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.fields().len(),
            %format,
            "loaded dataset"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.len(),
            dataset.fields().len(),
        );

        Ok(dataset.with_source(source))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();
        let mut pending = None;

        let headers: Vec<String> = if self.config.has_header {
            unique_headers(reader_headers(bytes, delimiter, self.config.quote)?)
        } else {
            match records.next() {
                Some(Ok(first)) => {
                    let names = (0..first.len())
                        .map(|i| format!("column_{}", i + 1))
                        .collect();
                    pending = Some(first);
                    names
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(RoadstatsError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.is_empty() {
            return Err(RoadstatsError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        let raw_rows = pending.into_iter().map(Ok).chain(records);

        for (row_idx, result) in raw_rows.enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let raw = result?;
            let mut record = Record::with_capacity(headers.len());
            // Short rows are padded with nulls, long rows truncated
            for (i, name) in headers.iter().enumerate() {
                let value = raw.get(i).map(Value::from_cell).unwrap_or(Value::Null);
                record.insert(name.clone(), value);
            }
            rows.push(record);
        }

        if rows.is_empty() {
            return Err(RoadstatsError::EmptyData("No data rows found".to_string()));
        }

        debug!(rows = rows.len(), "parsed delimited rows");
        Ok(Dataset::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the header row with a separate reader so the record iterator keeps
/// its own position.
fn reader_headers(bytes: &[u8], delimiter: u8, quote: u8) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .flexible(true)
        .from_reader(bytes);

    Ok(reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect())
}

/// Give every column a distinct name so no cell is overwritten in a record.
///
/// Blank headers become `column_N` (1-based position); repeats of a name get
/// `_2`, `_3`, ... suffixes.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("column_{}", i + 1)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        if n > 1 {
            warn!(header = %base, renamed = %candidate, "duplicate column name");
        }

        seen.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(RoadstatsError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
