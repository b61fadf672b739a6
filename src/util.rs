// Parsing and formatting helpers.
//
// The loader hands over loosely typed cells; everything here turns them into
// typed values or into strings for the console and CSV previews.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse an 8-digit `YYYYMMDD` cutoff code.
///
/// Returns `None` for anything that is not exactly eight ASCII digits forming a
/// real calendar date.
pub fn parse_date_code(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `100 * numerator / total`, NaN when the total is zero or either side is missing.
pub fn percentage(numerator: Option<u64>, total: Option<u64>) -> f64 {
    match (numerator, total) {
        (Some(n), Some(t)) if t > 0 => n as f64 / t as f64 * 100.0,
        _ => f64::NAN,
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return "NaN".to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Thousands separators only go on the integer part.
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn format_count(n: Option<u64>) -> String {
    n.map(format_int).unwrap_or_default()
}

pub fn format_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "NaT".to_string())
}
