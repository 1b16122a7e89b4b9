//! Turns a CSV table into the list of actions offered to the ranking service.
//!
//! Row 0 is the header: column 0 names the id column, the remaining columns
//! name features. Every following row becomes one [`RankableAction`].
//!
//! The last header column is not part of any feature set unless
//! [`ColumnSpan::All`] is requested.

use crate::features::FeatureSet;
use crate::table::CsvRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no header row")]
    MissingHeader,
    #[error("row {row} has {found} fields, header has {expected}")]
    RowTooShort {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("feature '{0}' appears more than once in the header")]
    DuplicateFeature(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A candidate the service may recommend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankableAction {
    pub id: String,
    /// Sent as a one-element list holding the whole feature object.
    #[serde(with = "single_feature_object")]
    pub features: FeatureSet,
}

/// Which header columns become features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSpan {
    /// Columns `1 ..= len - 2`; the last header column is dropped.
    #[default]
    SkipLast,
    /// Columns `1 ..= len - 1`.
    All,
}

impl ColumnSpan {
    fn end(self, header_len: usize) -> usize {
        match self {
            ColumnSpan::SkipLast => header_len.saturating_sub(1),
            ColumnSpan::All => header_len,
        }
    }
}

/// Actions built from one catalog file, plus the header they were built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCatalog {
    header: CsvRow,
    actions: Vec<RankableAction>,
}

impl ActionCatalog {
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn actions(&self) -> &[RankableAction] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Header name of feature column `n` (1-based), if the header has one.
    #[must_use]
    pub fn feature_label(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.header.get(n).map(String::as_str)
    }
}

/// Builds the catalog with the default [`ColumnSpan::SkipLast`] slicing.
pub fn build_actions(rows: &[CsvRow]) -> Result<ActionCatalog> {
    build_actions_with(rows, ColumnSpan::default())
}

pub fn build_actions_with(rows: &[CsvRow], span: ColumnSpan) -> Result<ActionCatalog> {
    let (header, data) = rows.split_first().ok_or(CatalogError::MissingHeader)?;
    let end = span.end(header.len());

    let mut actions = Vec::with_capacity(data.len());
    for (idx, row) in data.iter().enumerate() {
        if row.len() < header.len() {
            return Err(CatalogError::RowTooShort {
                row: idx + 1,
                expected: header.len(),
                found: row.len(),
            });
        }

        let mut features = FeatureSet::new();
        for (name, value) in header.iter().zip(row).take(end).skip(1) {
            if !features.insert(name.as_str(), value.as_str()) {
                return Err(CatalogError::DuplicateFeature(name.clone()));
            }
        }

        actions.push(RankableAction {
            id: row[0].clone(),
            features,
        });
    }

    Ok(ActionCatalog {
        header: header.clone(),
        actions,
    })
}

mod single_feature_object {
    use crate::features::FeatureSet;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(set: &FeatureSet, s: S) -> Result<S::Ok, S::Error> {
        [set].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FeatureSet, D::Error> {
        let sets = Vec::<FeatureSet>::deserialize(d)?;
        let mut merged = FeatureSet::new();
        for set in sets {
            for (k, v) in set.iter() {
                if !merged.insert(k, v) {
                    return Err(serde::de::Error::custom(format!("duplicate feature '{k}'")));
                }
            }
        }
        Ok(merged)
    }
}
