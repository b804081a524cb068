use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization as _;

use super::model::{columns, CleanedRecord};

// ---------------------------------------------------------------------------
// View criteria: filters + sort
// ---------------------------------------------------------------------------

/// Exact-match filter on one text column. `All` is the "no filter" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldFilter {
    #[default]
    All,
    Only(String),
}

impl FieldFilter {
    fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Only(wanted) => value == Some(wanted.as_str()),
        }
    }

    fn trimmed(self) -> Self {
        match self {
            FieldFilter::Only(v) => FieldFilter::Only(v.trim().to_string()),
            all => all,
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFilter::All => write!(f, "All"),
            FieldFilter::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Columns the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    LayoutName,
    Type,
    Config,
    Bua,
    Plot,
    LaunchPrice,
    BuaPsf,
    PlotPsf,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::LayoutName,
        SortKey::Type,
        SortKey::Config,
        SortKey::Bua,
        SortKey::Plot,
        SortKey::LaunchPrice,
        SortKey::BuaPsf,
        SortKey::PlotPsf,
    ];

    /// Column header used by the table.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::LayoutName => "Layout",
            SortKey::Type => "Type",
            SortKey::Config => "Config",
            SortKey::Bua => "BUA (sqft)",
            SortKey::Plot => "Plot (sqft)",
            SortKey::LaunchPrice => "Launch Price",
            SortKey::BuaPsf => "BUA PSF",
            SortKey::PlotPsf => "Plot PSF",
        }
    }

    fn numeric_field(self) -> Option<fn(&CleanedRecord) -> Option<f64>> {
        let field: fn(&CleanedRecord) -> Option<f64> = match self {
            SortKey::Bua => |r: &CleanedRecord| r.bua_numeric,
            SortKey::Plot => |r: &CleanedRecord| r.plot_numeric,
            SortKey::LaunchPrice => |r: &CleanedRecord| r.launch_price_millions,
            SortKey::BuaPsf => |r: &CleanedRecord| r.bua_psf_numeric,
            SortKey::PlotPsf => |r: &CleanedRecord| r.plot_psf_numeric,
            SortKey::LayoutName | SortKey::Type | SortKey::Config => return None,
        };
        Some(field)
    }

    fn text_column(self) -> &'static str {
        match self {
            SortKey::Type => columns::TYPE,
            SortKey::Config => columns::CONFIG,
            _ => columns::LAYOUT_NAME,
        }
    }

    /// Ascending comparison of two records on this key.
    ///
    /// Absent numbers compare as 0 and absent text as the empty string.
    fn compare(self, a: &CleanedRecord, b: &CleanedRecord) -> Ordering {
        match self.numeric_field() {
            Some(field) => {
                let x = field(a).unwrap_or(0.0);
                let y = field(b).unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            None => {
                let col = self.text_column();
                collate(
                    a.field(col).unwrap_or_default(),
                    b.field(col).unwrap_or_default(),
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::LayoutName,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortSpec {
    /// The sort order that results from clicking `key` while `self` is active:
    /// the active ascending key flips to descending, anything else starts
    /// ascending on `key`.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        SortSpec { key, direction }
    }
}

/// Active filters and sort order for the table view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCriteria {
    type_filter: FieldFilter,
    config_filter: FieldFilter,
    sort: SortSpec,
}

impl ViewCriteria {
    pub fn type_filter(&self) -> &FieldFilter {
        &self.type_filter
    }

    pub fn config_filter(&self) -> &FieldFilter {
        &self.config_filter
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_type_filter(&mut self, filter: FieldFilter) {
        self.type_filter = filter;
    }

    /// Config filters are matched on trimmed text; the value is trimmed here,
    /// once, rather than per record.
    pub fn set_config_filter(&mut self, filter: FieldFilter) {
        self.config_filter = filter.trimmed();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn matches(&self, record: &CleanedRecord) -> bool {
        self.type_filter.accepts(Some(record.property_type()))
            && self.config_filter.accepts(record.config())
    }
}

// ---------------------------------------------------------------------------
// Filter / sort view
// ---------------------------------------------------------------------------

/// The filtered, sorted view as indices into `records`, in display order.
///
/// The sort is stable: records that compare equal keep their source order.
pub fn compute_view(records: &[CleanedRecord], criteria: &ViewCriteria) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect();

    let SortSpec { key, direction } = criteria.sort;
    indices.sort_by(|&a, &b| {
        let ord = key.compare(&records[a], &records[b]);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    indices
}

// ---------------------------------------------------------------------------
// Text collation
// ---------------------------------------------------------------------------

/// Compare text the way a reader expects a sorted list to look.
///
/// Characters rank whitespace, punctuation, symbols, digits, letters. Letters
/// compare by base character ignoring case and accents; accents break ties
/// next, then lowercase sorts before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_chars(a)
        .map(primary_weight)
        .cmp(base_chars(b).map(primary_weight))
        .then_with(|| folded_chars(a).cmp(folded_chars(b)))
        .then_with(|| {
            a.nfkc()
                .map(char::is_uppercase)
                .cmp(b.nfkc().map(char::is_uppercase))
        })
}

const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%";
const SYMBOL_ORDER: &str = "`^+<=>|~$";

/// (class, position within class) of a base character.
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(i) = PUNCTUATION_ORDER.find(c) {
        (1, i as u32)
    } else if let Some(i) = SYMBOL_ORDER.find(c) {
        (2, i as u32)
    } else if c.is_numeric() {
        (3, c as u32)
    } else if c.is_alphabetic() {
        (4, c as u32)
    } else {
        // Remaining non-ASCII marks and symbols follow the listed ones.
        (2, SYMBOL_ORDER.len() as u32 + c as u32)
    }
}

fn base_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn folded_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfkc().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LayoutDataset, RawRecord};

    fn dataset() -> LayoutDataset {
        let rows = [
            ("Beach Villa", "B-1", "5 Bed", "7,500", "18.5M"),
            ("Coral Villa", "C-1", "4 Bed", "5,200", ""),
            ("Beach Villa", "B-2", " 4 Bed ", "6,100", "15M"),
            ("Plots", "P-1", "", "", "9,000,000"),
            ("Coral Villa", "c-0", "4 Bed", "5,200", "11M"),
        ];
        let raw: Vec<RawRecord> = rows
            .iter()
            .map(|&(ty, name, cfg, bua, price)| {
                [
                    (columns::TYPE, ty),
                    (columns::LAYOUT_NAME, name),
                    (columns::CONFIG, cfg),
                    (columns::BUA, bua),
                    (columns::LAUNCH_PRICE, price),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        LayoutDataset::from_raw(raw)
    }

    fn view_names(ds: &LayoutDataset, criteria: &ViewCriteria) -> Vec<String> {
        compute_view(&ds.records, criteria)
            .into_iter()
            .map(|i| ds.records[i].layout_name().unwrap_or_default().to_string())
            .collect()
    }

    fn sorted_by(key: SortKey, direction: SortDirection) -> ViewCriteria {
        let mut criteria = ViewCriteria::default();
        criteria.set_sort(SortSpec { key, direction });
        criteria
    }

    fn filtered(type_filter: FieldFilter, config_filter: FieldFilter) -> ViewCriteria {
        let mut criteria = ViewCriteria::default();
        criteria.set_type_filter(type_filter);
        criteria.set_config_filter(config_filter);
        criteria
    }

    #[test]
    fn no_filter_keeps_every_record() {
        let ds = dataset();
        let view = compute_view(&ds.records, &ViewCriteria::default());
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn type_filter_is_exact() {
        let ds = dataset();
        let criteria = filtered(FieldFilter::Only("Coral Villa".into()), FieldFilter::All);
        let view = compute_view(&ds.records, &criteria);
        assert_eq!(view.len(), 2);
        assert!(view
            .iter()
            .all(|&i| ds.records[i].property_type() == "Coral Villa"));
    }

    #[test]
    fn config_filter_value_is_trimmed_but_records_are_not() {
        let ds = dataset();
        let criteria = filtered(FieldFilter::All, FieldFilter::Only(" 4 Bed ".into()));
        assert_eq!(criteria.config_filter(), &FieldFilter::Only("4 Bed".into()));

        // "B-2" stores " 4 Bed " and does not match the exact trimmed value.
        assert_eq!(view_names(&ds, &criteria), ["c-0", "C-1"]);
    }

    #[test]
    fn filters_combine() {
        let ds = dataset();
        let criteria = filtered(
            FieldFilter::Only("Beach Villa".into()),
            FieldFilter::Only("5 Bed".into()),
        );
        assert_eq!(view_names(&ds, &criteria), ["B-1"]);
    }

    #[test]
    fn numeric_sort_treats_absent_as_zero() {
        let ds = dataset();
        let criteria = sorted_by(SortKey::LaunchPrice, SortDirection::Ascending);
        assert_eq!(view_names(&ds, &criteria), ["C-1", "P-1", "c-0", "B-2", "B-1"]);

        let criteria = sorted_by(SortKey::Bua, SortDirection::Ascending);
        assert_eq!(view_names(&ds, &criteria)[0], "P-1");
    }

    #[test]
    fn numeric_sort_is_monotonic_and_a_permutation() {
        let ds = dataset();
        for key in SortKey::ALL {
            let Some(field) = key.numeric_field() else {
                continue;
            };
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let idx = compute_view(&ds.records, &sorted_by(key, direction));

                let mut seen = idx.clone();
                seen.sort_unstable();
                assert_eq!(seen, (0..ds.len()).collect::<Vec<_>>());

                let values: Vec<f64> = idx
                    .iter()
                    .map(|&i| field(&ds.records[i]).unwrap_or(0.0))
                    .collect();
                let ordered = values.windows(2).all(|w| match direction {
                    SortDirection::Ascending => w[0] <= w[1],
                    SortDirection::Descending => w[0] >= w[1],
                });
                assert!(ordered, "{key:?} {direction:?}: {values:?}");
            }
        }
    }

    #[test]
    fn missing_text_sorts_as_empty() {
        let raw: Vec<RawRecord> = [Some("A-1"), None, Some("_lot")]
            .into_iter()
            .map(|name| {
                let mut rec = RawRecord::new();
                rec.insert(columns::TYPE, "Villa");
                if let Some(name) = name {
                    rec.insert(columns::LAYOUT_NAME, name);
                }
                rec
            })
            .collect();
        let ds = LayoutDataset::from_raw(raw);

        let asc = sorted_by(SortKey::LayoutName, SortDirection::Ascending);
        assert_eq!(view_names(&ds, &asc), ["", "_lot", "A-1"]);

        let desc = sorted_by(SortKey::LayoutName, SortDirection::Descending);
        assert_eq!(view_names(&ds, &desc), ["A-1", "_lot", ""]);
    }

    #[test]
    fn ties_keep_source_order_in_both_directions() {
        let ds = dataset();
        // C-1 and c-0 share BUA 5,200; C-1 comes first in the source.
        let asc = sorted_by(SortKey::Bua, SortDirection::Ascending);
        assert_eq!(view_names(&ds, &asc), ["P-1", "C-1", "c-0", "B-2", "B-1"]);

        let desc = sorted_by(SortKey::Bua, SortDirection::Descending);
        assert_eq!(view_names(&ds, &desc), ["B-1", "B-2", "C-1", "c-0", "P-1"]);
    }

    #[test]
    fn text_sort_ignores_case_first() {
        let ds = dataset();
        let view = view_names(&ds, &ViewCriteria::default());
        assert_eq!(view, ["B-1", "B-2", "c-0", "C-1", "P-1"]);
    }

    #[test]
    fn collation_orders_case_and_accents() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("résumé", "resume"), Ordering::Greater);
        assert_eq!(collate("résumé", "rf"), Ordering::Less);
        assert_eq!(collate("", "a"), Ordering::Less);
        assert_eq!(collate("Villa", "Villa"), Ordering::Equal);
    }

    #[test]
    fn collation_puts_punctuation_and_symbols_before_digits() {
        for text in ["A_1", "A:1", "A@1", "A~1", "A 1", "A-1"] {
            assert_eq!(collate(text, "A1"), Ordering::Less, "{text}");
        }
        assert_eq!(collate("Villa:2", "Villa2"), Ordering::Less);
        assert_eq!(collate("A 1", "A_1"), Ordering::Less);
        assert_eq!(collate("A_1", "A~1"), Ordering::Less);
        assert_eq!(collate("9", "a"), Ordering::Less);
    }

    #[test]
    fn sort_toggle_policy() {
        let sort = SortSpec::default();
        let sort = sort.toggled(SortKey::LayoutName);
        assert_eq!(sort.direction, SortDirection::Descending);

        let sort = sort.toggled(SortKey::LayoutName);
        assert_eq!(sort.direction, SortDirection::Ascending);

        let sort = sort.toggled(SortKey::Bua);
        assert_eq!((sort.key, sort.direction), (SortKey::Bua, SortDirection::Ascending));
    }
}
