use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic type of a column, used by the display formatters.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Column {
    pub description: String,
    #[serde(default)]
    pub kind: ColumnKind,
}

/// Lookup service for column descriptions and kinds. Columns missing from
/// the catalog fall back to the raw key with `Text` semantics.
#[derive(Debug, Default, Clone)]
pub struct ColumnCatalog {
    columns: HashMap<String, Column>,
}

impl ColumnCatalog {
    pub fn new(columns: HashMap<String, Column>) -> Self {
        Self { columns }
    }

    pub fn describe<'a>(&'a self, key: &'a str) -> &'a str {
        self.columns
            .get(key)
            .map(|c| c.description.as_str())
            .unwrap_or(key)
    }

    pub fn kind(&self, key: &str) -> ColumnKind {
        self.columns.get(key).map(|c| c.kind).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Catalog entries sorted by key, for listing.
    pub fn sorted(&self) -> Vec<(&str, &Column)> {
        let mut entries: Vec<_> = self
            .columns
            .iter()
            .map(|(k, c)| (k.as_str(), c))
            .collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
