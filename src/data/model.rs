use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate, Aggregation};
use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Column names of the source sheet
// ---------------------------------------------------------------------------

/// Fixed header names of a layout sheet.
pub mod columns {
    pub const TYPE: &str = "Type";
    pub const CONFIG: &str = "Config";
    pub const LAYOUT_NAME: &str = "Layout Name";
    pub const BUA: &str = "BUA (in sqft)";
    pub const PLOT_SIZE: &str = "Plot Size (in sqft)";
    pub const LAUNCH_PRICE: &str = "Launched Price (in AED)";
    pub const BUA_PSF: &str = "BUA PSF (in AED Per sqft)";
    pub const PLOT_PSF: &str = "Plot PSF (in AED Per sqft)";
    pub const FACTORS: &str = "Factors";
}

// ---------------------------------------------------------------------------
// RawRecord – one decoded row, all cells as text
// ---------------------------------------------------------------------------

/// A source row keyed by header name. Missing cells are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Whether the row carries a non-blank `Type`.
    pub fn has_type(&self) -> bool {
        self.get(columns::TYPE).is_some_and(|t| !t.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRecord(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// CleanedRecord – raw row plus typed numeric fields
// ---------------------------------------------------------------------------

/// A row after numeric normalization.
///
/// Every derived field is `None` when its source text was empty or could not
/// be parsed; a stored value is always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bua_numeric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_numeric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_price_millions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bua_psf_numeric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_psf_numeric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
}

impl CleanedRecord {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.raw.get(column)
    }

    /// Category key. Never empty for records built through [`LayoutDataset`].
    pub fn property_type(&self) -> &str {
        self.field(columns::TYPE).unwrap_or_default()
    }

    pub fn config(&self) -> Option<&str> {
        self.field(columns::CONFIG)
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.field(columns::LAYOUT_NAME)
    }
}

// ---------------------------------------------------------------------------
// Aggregation outputs
// ---------------------------------------------------------------------------

/// Per-`Type` averages over the full (unfiltered) collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub property_type: String,
    /// Rounded mean BUA; `None` when no record of the category has one
    /// (not displayable, never zero-filled).
    pub average_bua: Option<f64>,
    /// Rounded mean plot size; `0` when no record of the category has one.
    pub average_plot: f64,
    /// Mean launch price in millions, one decimal; `None` when unpriced.
    pub average_price_millions: Option<f64>,
    pub record_count: usize,
    pub bua_count: usize,
    pub plot_count: usize,
    pub price_count: usize,
}

/// One scatter point: a record with both BUA and launch price present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPoint {
    pub name: String,
    pub property_type: String,
    pub bua: f64,
    pub price_millions: f64,
}

/// One bar pair of the size-range chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    /// Layout name, cut to 18 characters plus `...` when longer.
    pub label: String,
    pub bua: f64,
    /// `0` when the record has no plot size.
    pub plot: f64,
}

// ---------------------------------------------------------------------------
// LayoutDataset – the complete cleaned collection
// ---------------------------------------------------------------------------

/// The cleaned collection with everything derived from it once per load.
#[derive(Debug, Clone)]
pub struct LayoutDataset {
    /// Cleaned rows in source order. Never mutated after construction.
    pub records: Vec<CleanedRecord>,
    /// Distinct `Type` values, first-seen order.
    pub type_options: Vec<String>,
    /// Distinct trimmed, non-empty `Config` values, first-seen order.
    pub config_options: Vec<String>,
    pub aggregation: Aggregation,
}

impl LayoutDataset {
    /// Ingest decoded rows: drop rows without a `Type`, normalize the rest and
    /// compute the category aggregates.
    pub fn from_raw(raw: Vec<RawRecord>) -> Self {
        let total = raw.len();
        let records: Vec<CleanedRecord> = raw
            .into_iter()
            .filter(RawRecord::has_type)
            .map(normalize)
            .collect();

        if records.len() < total {
            log::debug!(
                "Dropped {} of {total} rows with a blank Type",
                total - records.len()
            );
        }

        let mut type_options: Vec<String> = Vec::new();
        let mut config_options: Vec<String> = Vec::new();
        for rec in &records {
            let ty = rec.property_type();
            if !type_options.iter().any(|t| t == ty) {
                type_options.push(ty.to_string());
            }
            if let Some(cfg) = rec.config().map(str::trim).filter(|c| !c.is_empty()) {
                if !config_options.iter().any(|c| c == cfg) {
                    config_options.push(cfg.to_string());
                }
            }
        }

        let aggregation = aggregate(&records);

        LayoutDataset {
            records,
            type_options,
            config_options,
            aggregation,
        }
    }

    /// Number of cleaned records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ty: &str, config: &str) -> RawRecord {
        [(columns::TYPE, ty), (columns::CONFIG, config)]
            .into_iter()
            .collect()
    }

    #[test]
    fn blank_types_are_dropped_at_ingestion() {
        let mut missing = RawRecord::new();
        missing.insert(columns::CONFIG, "3 Bed");

        let ds = LayoutDataset::from_raw(vec![
            row("Villa", "4 Bed"),
            row("   ", "4 Bed"),
            missing,
            row("Plots", ""),
        ]);

        assert_eq!(ds.len(), 2);
        assert!(ds.records.iter().all(|r| !r.property_type().is_empty()));
    }

    #[test]
    fn option_lists_keep_first_seen_order() {
        let ds = LayoutDataset::from_raw(vec![
            row("Coral Villa", " 5 Bed "),
            row("Beach Villa", "4 Bed"),
            row("Coral Villa", "5 Bed"),
            row("Plots", ""),
        ]);

        assert_eq!(ds.type_options, ["Coral Villa", "Beach Villa", "Plots"]);
        assert_eq!(ds.config_options, ["5 Bed", "4 Bed"]);
    }

    #[test]
    fn cleaned_record_serializes_raw_fields_and_present_values_only() {
        let mut raw = row("Villa", "4 Bed + Maid");
        raw.insert(columns::BUA, "12,500");
        let ds = LayoutDataset::from_raw(vec![raw]);

        let json = serde_json::to_value(&ds.records[0]).unwrap();
        assert_eq!(json["Type"], "Villa");
        assert_eq!(json["buaNumeric"], 12500.0);
        assert_eq!(json["bedrooms"], 4);
        assert!(json.get("plotNumeric").is_none());
    }
}
