use std::sync::OnceLock;

use regex::Regex;

use super::model::{columns, CleanedRecord, RawRecord};

// ---------------------------------------------------------------------------
// Record normalization
// ---------------------------------------------------------------------------

/// Clean one raw row into a [`CleanedRecord`].
///
/// Never fails: a field whose text is empty or unparseable is left `None`.
pub fn normalize(raw: RawRecord) -> CleanedRecord {
    let text = |col: &str| raw.get(col).filter(|t| !t.is_empty());

    let bua_numeric = text(columns::BUA).and_then(parse_bua);
    let plot_numeric = text(columns::PLOT_SIZE).and_then(parse_plot_size);
    let launch_price_millions = text(columns::LAUNCH_PRICE).and_then(parse_launch_price_millions);
    let bua_psf_numeric = text(columns::BUA_PSF).and_then(parse_psf);
    let plot_psf_numeric = text(columns::PLOT_PSF).and_then(parse_psf);
    let bedrooms = text(columns::CONFIG).and_then(parse_bedrooms);

    CleanedRecord {
        raw,
        bua_numeric,
        plot_numeric,
        launch_price_millions,
        bua_psf_numeric,
        plot_psf_numeric,
        bedrooms,
    }
}

// ---------------------------------------------------------------------------
// Per-field parsers
// ---------------------------------------------------------------------------

/// `"12,500"` → `12500`.
pub fn parse_bua(text: &str) -> Option<f64> {
    parse_float_prefix(&strip_commas(text))
}

/// Plot sizes may be approximate (`~`) or a range (`"4,000-6,000"` → midpoint).
pub fn parse_plot_size(text: &str) -> Option<f64> {
    let text = text.replace('~', "");
    let text = text.trim();
    if text.contains('-') {
        range_midpoint(text)
    } else {
        parse_float_prefix(&strip_commas(text))
    }
}

/// Launch price in millions: `"2.5M"` is already in millions, a plain figure
/// such as `"2,500,000"` is converted.
///
/// A plain small number like `"3"` is still divided (0.000003).
pub fn parse_launch_price_millions(text: &str) -> Option<f64> {
    if let Some(caps) = millions_pattern().captures(text) {
        return parse_float_prefix(&caps[1]);
    }
    parse_float_prefix(&strip_commas(text)).map(|v| v / 1_000_000.0)
}

/// Price per square foot, either a range or a single figure with optional
/// `~` and `(avg)` annotations.
pub fn parse_psf(text: &str) -> Option<f64> {
    if text.contains('-') {
        return range_midpoint(text);
    }
    let cleaned = text.replace(['~', ','], "");
    let cleaned = avg_annotation().replace_all(&cleaned, "");
    parse_float_prefix(&cleaned)
}

/// First run of digits in the config text: `"4 Bed + Maid"` → `4`.
pub fn parse_bedrooms(text: &str) -> Option<u32> {
    digit_run().find(text)?.as_str().parse().ok()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn millions_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+\.?[0-9]*)M").expect("valid millions pattern"))
}

fn avg_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\(\s*avg\s*\)").expect("valid avg pattern"))
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("valid digit pattern"))
}

fn strip_commas(text: &str) -> String {
    text.replace(',', "")
}

/// Mean of an `"A-B"` range. Exactly two operands are required.
fn range_midpoint(text: &str) -> Option<f64> {
    let mut parts = text.split('-');
    let (low, high) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let low = parse_float_prefix(&strip_commas(low))?;
    let high = parse_float_prefix(&strip_commas(high))?;
    Some((low + high) / 2.0).filter(|v| v.is_finite())
}

/// Parse the longest decimal prefix of `text` after leading whitespace,
/// ignoring whatever follows (`"3500 sqft"` → `3500`).
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let b = s.as_bytes();
    let mut end = 0;

    if matches!(b.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < b.len() && b[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if digits + (j - frac_start) > 0 {
            digits += j - frac_start;
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < b.len() && matches!(b[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, &str)]) -> RawRecord {
        cells.iter().copied().collect()
    }

    #[test]
    fn bua_strips_thousands_separators() {
        assert_eq!(parse_bua("12,500"), Some(12500.0));
        assert_eq!(parse_bua("1,234,567.5"), Some(1234567.5));
        assert_eq!(parse_bua("n/a"), None);
    }

    #[test]
    fn plot_range_takes_midpoint() {
        assert_eq!(parse_plot_size("4,000-6,000"), Some(5000.0));
        assert_eq!(parse_plot_size("~ 4,000 - 6,000"), Some(5000.0));
        assert_eq!(parse_plot_size("~7,500"), Some(7500.0));
    }

    #[test]
    fn malformed_ranges_are_absent() {
        assert_eq!(parse_plot_size("1-2-3"), None);
        assert_eq!(parse_plot_size("abc-6,000"), None);
        assert_eq!(parse_psf("1,000-"), None);
    }

    #[test]
    fn launch_price_in_millions() {
        assert_eq!(parse_launch_price_millions("2.5M"), Some(2.5));
        assert_eq!(parse_launch_price_millions("AED 12M"), Some(12.0));
        assert_eq!(parse_launch_price_millions("2500000"), Some(2.5));
        assert_eq!(parse_launch_price_millions("2,500,000"), Some(2.5));
        assert_eq!(parse_launch_price_millions("TBA"), None);
    }

    #[test]
    fn small_plain_price_is_still_treated_as_raw_currency() {
        // Known edge case: "3" is read as AED 3, not 3 million.
        assert_eq!(parse_launch_price_millions("3"), Some(0.000003));
    }

    #[test]
    fn psf_handles_approximation_and_avg_annotation() {
        assert_eq!(parse_psf("~1,200 (avg)"), Some(1200.0));
        assert_eq!(parse_psf("1,200(AVG)"), Some(1200.0));
        assert_eq!(parse_psf("1,000-1,400"), Some(1200.0));
        // Range operands keep their `~`, so this one does not parse.
        assert_eq!(parse_psf("~1,000-1,400"), None);
    }

    #[test]
    fn bedrooms_from_first_digit_run() {
        assert_eq!(parse_bedrooms("4 Bed + Maid"), Some(4));
        assert_eq!(parse_bedrooms("Type B 10BR"), Some(10));
        assert_eq!(parse_bedrooms("Studio"), None);
    }

    #[test]
    fn only_ascii_digits_count() {
        assert_eq!(parse_bedrooms("٤ غرف / 4 Bed"), Some(4));
        assert_eq!(parse_bedrooms("٤ غرف"), None);
        assert_eq!(parse_launch_price_millions("١٢M / 12M"), Some(12.0));
    }

    #[test]
    fn float_prefix_follows_lenient_parsing() {
        assert_eq!(parse_float_prefix("  3500 sqft"), Some(3500.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn empty_cells_leave_fields_absent() {
        let cleaned = normalize(record(&[
            (columns::TYPE, "Villa"),
            (columns::BUA, ""),
            (columns::PLOT_SIZE, "  "),
        ]));
        assert_eq!(cleaned.bua_numeric, None);
        assert_eq!(cleaned.plot_numeric, None);
        assert_eq!(cleaned.launch_price_millions, None);
        assert_eq!(cleaned.bedrooms, None);
    }

    #[test]
    fn normalize_keeps_raw_text_and_is_deterministic() {
        let raw = record(&[
            (columns::TYPE, "Beach Villa"),
            (columns::CONFIG, "5 Bed"),
            (columns::BUA, "7,500"),
            (columns::PLOT_SIZE, "~10,000-12,000"),
            (columns::LAUNCH_PRICE, "18.5M"),
            (columns::BUA_PSF, "~2,466 (avg)"),
            (columns::PLOT_PSF, "1,500-1,700"),
        ]);

        let first = normalize(raw.clone());
        let second = normalize(raw.clone());
        assert_eq!(first, second);
        assert_eq!(first.raw, raw);
        assert_eq!(first.bua_numeric, Some(7500.0));
        assert_eq!(first.plot_numeric, Some(11000.0));
        assert_eq!(first.launch_price_millions, Some(18.5));
        assert_eq!(first.bua_psf_numeric, Some(2466.0));
        assert_eq!(first.plot_psf_numeric, Some(1600.0));
        assert_eq!(first.bedrooms, Some(5));
    }
}
