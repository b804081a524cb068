// ---------------------------------------------------------------------------
// Display formatting for table cells and chart labels
// ---------------------------------------------------------------------------

/// Whole number with `,` grouping (`12500.4` → `"12,500"`); `-` when absent.
pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => group_thousands(v.round()),
        None => "-".to_string(),
    }
}

/// Millions with one decimal (`1.52` → `"1.5M"`); `-` when absent.
pub fn format_millions(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.1}M"),
        None => "-".to_string(),
    }
}

fn group_thousands(whole: f64) -> String {
    let digits = format!("{:.0}", whole.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
