//! Static company directory with case-insensitive search

use crate::error::{DashboardError, Result};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// One listed company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub symbol: String,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Company", alias = "name", alias = "Name")]
    company: String,
    #[serde(alias = "Symbol", alias = "ticker", alias = "Ticker")]
    symbol: String,
}

/// Read-only table of companies, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    records: Vec<CompanyRecord>,
}

impl CompanyDirectory {
    pub fn from_records(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    /// Load a `company,symbol` CSV file.
    ///
    /// Any unreadable or malformed row fails the whole load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading company directory from: {}", path.display());

        let file = File::open(path).map_err(|e| {
            DashboardError::DataSource(format!("Failed to open '{}': {e}", path.display()))
        })?;
        let directory = Self::from_reader(file)?;

        info!("Loaded {} companies", directory.len());
        Ok(directory)
    }

    /// Parse directory CSV from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let row = result.map_err(|e| {
                DashboardError::DataSource(format!("Malformed directory row at line {line}: {e}"))
            })?;

            if row.company.is_empty() || row.symbol.is_empty() {
                return Err(DashboardError::DataSource(format!(
                    "Directory row at line {line} has an empty company or symbol"
                )));
            }

            records.push(CompanyRecord::new(row.company, row.symbol));
        }

        Ok(Self { records })
    }

    /// Records whose name or symbol contains `query`, ignoring case.
    ///
    /// Callers must not pass an empty or blank query.
    pub fn search(&self, query: &str) -> Vec<CompanyRecord> {
        debug_assert!(!query.trim().is_empty(), "search called with blank query");
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
