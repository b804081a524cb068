use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::model::{CategoryAggregate, CleanedRecord, CorrelationPoint, SizeRange};

// ---------------------------------------------------------------------------
// Category aggregation over the full cleaned collection
// ---------------------------------------------------------------------------

/// Everything the comparison charts need, computed once per load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// One entry per distinct `Type`, first-seen order.
    pub categories: Vec<CategoryAggregate>,
    /// Records with both BUA and launch price, input order.
    pub correlation: Vec<CorrelationPoint>,
}

/// Running sum and count of the present values of one field.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.total += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

#[derive(Debug, Default)]
struct CategoryTotals {
    records: usize,
    bua: Mean,
    plot: Mean,
    price: Mean,
}

/// Compute per-category averages and the BUA/price correlation points.
pub fn aggregate(records: &[CleanedRecord]) -> Aggregation {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, CategoryTotals> = HashMap::new();

    for rec in records {
        let ty = rec.property_type();
        let entry = totals.entry(ty).or_insert_with(|| {
            order.push(ty);
            CategoryTotals::default()
        });
        entry.records += 1;
        entry.bua.add(rec.bua_numeric);
        entry.plot.add(rec.plot_numeric);
        entry.price.add(rec.launch_price_millions);
    }

    let categories = order
        .into_iter()
        .filter_map(|ty| {
            let t = totals.get(ty)?;
            Some(CategoryAggregate {
                property_type: ty.to_string(),
                average_bua: t.bua.value().map(f64::round),
                average_plot: t.plot.value().map(f64::round).unwrap_or(0.0),
                average_price_millions: t.price.value().map(round_one_decimal),
                record_count: t.records,
                bua_count: t.bua.count,
                plot_count: t.plot.count,
                price_count: t.price.count,
            })
        })
        .collect();

    let correlation = records
        .iter()
        .filter_map(|rec| {
            Some(CorrelationPoint {
                name: rec.layout_name().unwrap_or_default().to_string(),
                property_type: rec.property_type().to_string(),
                bua: rec.bua_numeric?,
                price_millions: rec.launch_price_millions?,
            })
        })
        .collect();

    Aggregation {
        categories,
        correlation,
    }
}

// ---------------------------------------------------------------------------
// Size ranges over the visible rows
// ---------------------------------------------------------------------------

/// Longest layout name shown on the size-range axis before it is cut.
const SIZE_LABEL_CHARS: usize = 18;

/// BUA and plot size of each record that has a BUA, smallest BUA first.
///
/// Unlike [`aggregate`] this runs on whatever rows the caller passes,
/// normally the current filtered view. Equal BUAs keep their input order.
pub fn size_ranges<'a>(records: impl IntoIterator<Item = &'a CleanedRecord>) -> Vec<SizeRange> {
    let mut ranges: Vec<SizeRange> = records
        .into_iter()
        .filter_map(|rec| {
            Some(SizeRange {
                bua: rec.bua_numeric?,
                plot: rec.plot_numeric.unwrap_or(0.0),
                label: short_label(rec.layout_name().unwrap_or_default()),
            })
        })
        .collect();
    ranges.sort_by(|a, b| a.bua.partial_cmp(&b.bua).unwrap_or(Ordering::Equal));
    ranges
}

fn short_label(name: &str) -> String {
    if name.chars().count() > SIZE_LABEL_CHARS {
        let head: String = name.chars().take(SIZE_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Round half away from zero to one decimal place.
fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
