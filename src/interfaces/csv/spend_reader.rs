use crate::error::{Result, ToolError};
use serde::Deserialize;
use std::io::Read;

/// A spend typed into the table: 1-based period number and the raw field text.
///
/// The text is kept as entered so that empty and malformed values go through
/// the same normalization as an edited form field.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SpendEntry {
    pub period: usize,
    #[serde(default)]
    pub spend: String,
}

impl SpendEntry {
    /// Zero-based index of the pay period.
    pub fn index(&self) -> Option<usize> {
        self.period.checked_sub(1)
    }
}

/// Reads spend entries from a CSV source with a `period,spend` header.
pub struct SpendReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SpendReader<R> {
    /// Creates a new `SpendReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes entries.
    pub fn entries(self) -> impl Iterator<Item = Result<SpendEntry>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ToolError::from))
    }
}
