//! Record normalization: dirty-value filtering and rating coercion.
//!
//! Filtering is driven by an injected [`DirtyPatternTable`]. Rating coercion
//! is all-or-nothing: one non-numeric rating fails the whole batch and no
//! partial output is produced.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ConfigError;
use crate::models::{CleanRecord, Field, RawRecord};

/// A value marking a field as unusable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Sentinel {
    Value(String),
    /// The record does not carry the field at all
    Missing,
}

impl From<Option<String>> for Sentinel {
    fn from(value: Option<String>) -> Self {
        value.map_or(Sentinel::Missing, Sentinel::Value)
    }
}

impl From<Sentinel> for Option<String> {
    fn from(sentinel: Sentinel) -> Self {
        match sentinel {
            Sentinel::Value(v) => Some(v),
            Sentinel::Missing => None,
        }
    }
}

impl Sentinel {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Sentinel::Missing, None) => true,
            (Sentinel::Value(expected), Some(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Field → sentinel values that make a record unusable.
///
/// Serialized as a JSON object, with `null` standing for [`Sentinel::Missing`]:
/// `{"Title": ["Unknown Product"], "Price": ["Price Unavailable", null]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirtyPatternTable {
    patterns: BTreeMap<Field, Vec<Sentinel>>,
}

impl Default for DirtyPatternTable {
    fn default() -> Self {
        Self::new()
            .with(Field::Title, [Sentinel::Value("Unknown Product".to_string())])
            .with(
                Field::Rating,
                [
                    Sentinel::Value("Invalid Rating".to_string()),
                    Sentinel::Value("Not Rated".to_string()),
                ],
            )
            .with(
                Field::Price,
                [Sentinel::Value("Price Unavailable".to_string()), Sentinel::Missing],
            )
    }
}

impl DirtyPatternTable {
    /// An empty table that filters nothing
    pub fn new() -> Self {
        Self {
            patterns: BTreeMap::new(),
        }
    }

    pub fn with<I: IntoIterator<Item = Sentinel>>(mut self, field: Field, sentinels: I) -> Self {
        self.patterns.entry(field).or_default().extend(sentinels);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn sentinels(&self, field: Field) -> &[Sentinel] {
        self.patterns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.patterns.keys().copied()
    }

    /// True when `record` holds a sentinel in any of the checked fields
    fn is_dirty(&self, record: &RawRecord, checked: &[Field]) -> bool {
        checked.iter().any(|&field| {
            let value = record.field(field);
            self.sentinels(field)
                .iter()
                .any(|s| s.matches(value.as_deref()))
        })
    }
}

/// When blank rows (placeholders, all-empty products) are dropped.
///
/// Both filters judge each record on its own, so `BeforeDirtyFilter` and
/// `AfterDirtyFilter` yield the same records; only the per-stage counts in
/// the debug log differ. `Keep` is the one stage that changes the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyRowStage {
    BeforeDirtyFilter,
    #[default]
    AfterDirtyFilter,
    Keep,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizerOptions {
    pub empty_rows: EmptyRowStage,
}

/// Batch-level normalization failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Could not convert Rating '{value}' to a number (record {index})")]
    InvalidRating { index: usize, value: String },

    #[error("Record {index} is empty and cannot be converted")]
    EmptyRecord { index: usize },
}

pub struct Normalizer {
    table: DirtyPatternTable,
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(table: DirtyPatternTable, options: NormalizerOptions) -> Self {
        Self { table, options }
    }

    /// Drop records holding a dirty sentinel.
    ///
    /// Only table fields that some input record carries are checked; a batch
    /// made entirely of placeholders has no fields and passes unchanged.
    pub fn remove_dirty(&self, records: Vec<RawRecord>) -> Vec<RawRecord> {
        // Every product carries every field, so one product enables the whole table
        let has_fields = records.iter().any(|r| !r.is_placeholder());
        let checked: Vec<Field> = if has_fields {
            self.table.fields().collect()
        } else {
            Vec::new()
        };

        let before = records.len();
        let kept: Vec<RawRecord> = records
            .into_iter()
            .filter(|r| !self.table.is_dirty(r, &checked))
            .collect();
        tracing::debug!(removed = before - kept.len(), kept = kept.len(), "Removed dirty records");
        kept
    }

    /// Coerce every rating to `f64`; the first failure aborts the batch
    pub fn convert_type(&self, records: Vec<RawRecord>) -> Result<Vec<CleanRecord>, NormalizeError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| match record {
                RawRecord::Product(product) => product
                    .rating
                    .trim()
                    .parse::<f64>()
                    .map(|rating| CleanRecord::from_product(product, rating))
                    .map_err(|_| NormalizeError::InvalidRating {
                        index,
                        value: product.rating.clone(),
                    }),
                RawRecord::Placeholder => Err(NormalizeError::EmptyRecord { index }),
            })
            .collect()
    }

    /// Full normalization pass
    pub fn clean(&self, records: Vec<RawRecord>) -> Result<Vec<CleanRecord>, NormalizeError> {
        let received = records.len();
        let records = match self.options.empty_rows {
            EmptyRowStage::BeforeDirtyFilter => self.remove_dirty(drop_blank(records)),
            EmptyRowStage::AfterDirtyFilter => drop_blank(self.remove_dirty(records)),
            EmptyRowStage::Keep => self.remove_dirty(records),
        };

        let cleaned = self.convert_type(records).inspect_err(|e| {
            tracing::error!(error = %e, "Rating conversion failed");
        })?;
        tracing::info!(received, cleaned = cleaned.len(), "Normalized records");
        Ok(cleaned)
    }
}

fn drop_blank(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records.into_iter().filter(|r| !r.is_blank()).collect()
}
