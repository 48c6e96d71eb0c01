//! Result types produced by a batch.
//!
//! A [`ResultSet`] holds exactly one [`ResultRecord`] per uploaded image, in
//! upload order. Failed images keep their slot with a sentinel
//! [`ExtractionResult`] so the rendered table and the exported sheet always
//! line up with what the user uploaded.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};

/// Column headers shared by the HTML table and the spreadsheet.
pub const COLUMNS: [&str; 3] = ["File name", "Source text", "Translated text"];

/// Source-language text read from an image and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source_text: String,
    pub translated_text: String,
}

impl ExtractionResult {
    pub fn new(source_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            translated_text: translated_text.into(),
        }
    }
}

/// Outcome for a single uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Original upload file name.
    pub file_name: String,
    /// Parsed pair, or the sentinel pair when `error` is set.
    pub result: ExtractionResult,
    /// Why the image failed, if it did.
    pub error: Option<ItemError>,
    /// Wall-clock time spent on this image.
    pub duration_ms: u64,
}

impl ResultRecord {
    pub fn succeeded(file_name: impl Into<String>, result: ExtractionResult, duration_ms: u64) -> Self {
        Self {
            file_name: file_name.into(),
            result,
            error: None,
            duration_ms,
        }
    }

    /// Record a failure; the result is the error's sentinel pair.
    pub fn failed(file_name: impl Into<String>, error: ItemError, duration_ms: u64) -> Self {
        Self {
            file_name: file_name.into(),
            result: error.fallback(),
            error: Some(error),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The three table cells, in [`COLUMNS`] order.
    pub fn row(&self) -> [&str; 3] {
        [
            self.file_name.as_str(),
            self.result.source_text.as_str(),
            self.result.translated_text.as_str(),
        ]
    }
}

/// Ordered results of one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            records: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    /// Table rows in upload order.
    pub fn rows(&self) -> impl Iterator<Item = [&str; 3]> + '_ {
        self.records.iter().map(ResultRecord::row)
    }

    pub fn stats(&self) -> BatchStats {
        let succeeded = self.records.iter().filter(|r| r.is_success()).count();
        BatchStats {
            total_images: self.records.len(),
            succeeded,
            failed: self.records.len() - succeeded,
            total_duration_ms: self.records.iter().map(|r| r.duration_ms).sum(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Summary counters for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_images: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}
