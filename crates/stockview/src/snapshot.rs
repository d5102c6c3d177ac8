//! Descriptive attributes for a symbol

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shown for any attribute the provider did not supply
pub const NOT_AVAILABLE: &str = "N/A";

/// The attributes shown on the info panel, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotField {
    LongName,
    Sector,
    Industry,
    MarketCap,
    PreviousClose,
    Open,
    DayHigh,
    DayLow,
    FiftyTwoWeekHigh,
    FiftyTwoWeekLow,
    Volume,
    AverageVolume,
    DividendYield,
    ForwardPe,
    PriceToBook,
}

impl SnapshotField {
    pub const ALL: [SnapshotField; 15] = [
        SnapshotField::LongName,
        SnapshotField::Sector,
        SnapshotField::Industry,
        SnapshotField::MarketCap,
        SnapshotField::PreviousClose,
        SnapshotField::Open,
        SnapshotField::DayHigh,
        SnapshotField::DayLow,
        SnapshotField::FiftyTwoWeekHigh,
        SnapshotField::FiftyTwoWeekLow,
        SnapshotField::Volume,
        SnapshotField::AverageVolume,
        SnapshotField::DividendYield,
        SnapshotField::ForwardPe,
        SnapshotField::PriceToBook,
    ];

    /// Panel label
    pub fn label(self) -> &'static str {
        match self {
            SnapshotField::LongName => "Company Name",
            SnapshotField::Sector => "Sector",
            SnapshotField::Industry => "Industry",
            SnapshotField::MarketCap => "Market Cap",
            SnapshotField::PreviousClose => "Previous Close",
            SnapshotField::Open => "Open",
            SnapshotField::DayHigh => "Day's High",
            SnapshotField::DayLow => "Day's Low",
            SnapshotField::FiftyTwoWeekHigh => "52 Week High",
            SnapshotField::FiftyTwoWeekLow => "52 Week Low",
            SnapshotField::Volume => "Volume",
            SnapshotField::AverageVolume => "Average Volume",
            SnapshotField::DividendYield => "Dividend Yield",
            SnapshotField::ForwardPe => "Forward PE",
            SnapshotField::PriceToBook => "Price to Book",
        }
    }
}

/// A single scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(u64),
    Number(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Number(v) => write!(f, "{v:.2}"),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// Named scalar attributes for one symbol; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    fields: BTreeMap<SnapshotField, AttributeValue>,
}

impl Snapshot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field. Non-finite numbers and blank text are treated as absent.
    pub fn set(&mut self, field: SnapshotField, value: impl Into<AttributeValue>) {
        let value = value.into();
        let present = match &value {
            AttributeValue::Number(v) => v.is_finite(),
            AttributeValue::Text(v) => !v.trim().is_empty(),
            AttributeValue::Integer(_) => true,
        };
        if present {
            self.fields.insert(field, value);
        }
    }

    /// Builder-style [`Snapshot::set`]
    pub fn with(mut self, field: SnapshotField, value: impl Into<AttributeValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field only if a value is present
    pub fn set_opt<V: Into<AttributeValue>>(&mut self, field: SnapshotField, value: Option<V>) {
        if let Some(value) = value {
            self.set(field, value);
        }
    }

    pub fn get(&self, field: SnapshotField) -> Option<&AttributeValue> {
        self.fields.get(&field)
    }

    /// Field value for display, or [`NOT_AVAILABLE`]
    pub fn display(&self, field: SnapshotField) -> String {
        self.get(field)
            .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string)
    }

    /// Copy every field from `other` that this snapshot lacks
    pub fn fill_missing_from(&mut self, other: Snapshot) {
        for (field, value) in other.fields {
            self.fields.entry(field).or_insert(value);
        }
    }

    /// `(label, display value)` rows in panel order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        SnapshotField::ALL
            .iter()
            .map(|&field| (field.label(), self.display(field)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
