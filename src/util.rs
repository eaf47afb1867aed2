// Utility helpers for parsing and basic statistics.
//
// All of the "dirty" CSV field handling lives here so the rest of the code
// can assume clean, typed values. None of these functions fail: a value that
// cannot be read turns into `None`, `0`, `false` or an empty list.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::Deserialize;

/// Parse a string-like value into `f64`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Returns `None` for empty input, unparseable text, `NaN` and infinities.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Money, counts, popularity and ratings are never negative; anything that
/// does not read as a non-negative number becomes `0`.
pub fn coerce_amount(s: Option<&str>) -> f64 {
    parse_f64_safe(s).filter(|v| *v >= 0.0).unwrap_or(0.0)
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Release dates come as `dd/mm/yyyy`. Anything that does not split into
/// exactly three integer parts, or names a day that does not exist, is
/// treated as absent.
pub fn parse_dmy_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let day = parts[0].trim().parse::<u32>().ok()?;
    let month = parts[1].trim().parse::<u32>().ok()?;
    let year = parts[2].trim().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn parse_flag(s: Option<&str>) -> bool {
    s.map(|v| v.trim().eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Non-empty trimmed text, or `None`.
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NamedEntry {
    Named { name: String },
    Bare(String),
}

#[derive(Deserialize)]
struct NamedObject {
    name: String,
}

// The export writes Python-style literals: `[{'id': 18, 'name': 'Drama'}]`.
// Swapping every single quote for a double quote turns most of them into
// JSON; the ones it does not (names with apostrophes, `None`) are dropped.
fn requote(s: &str) -> String {
    s.replace('\'', "\"")
}

/// Decode a single-quoted list of `{name}` objects (or bare strings) into
/// the names, in order. Any decode failure yields an empty list.
pub fn decode_named_list(s: Option<&str>) -> Vec<String> {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<NamedEntry>>(&requote(s)) {
        Ok(entries) => entries
            .into_iter()
            .map(|e| match e {
                NamedEntry::Named { name } => name,
                NamedEntry::Bare(name) => name,
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Same adapter for a single `{name}` object, e.g. a collection.
pub fn decode_named_object(s: Option<&str>) -> Option<String> {
    let s = s.map(str::trim).filter(|s| !s.is_empty())?;
    serde_json::from_str::<NamedObject>(&requote(s)).ok().map(|o| o.name)
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed number of decimal places plus locale thousands separators,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_digits(int_part);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Insert the locale thousands separator into a plain digit string. Works on
/// the text so amounts beyond any integer type keep every digit.
fn group_digits(digits: &str) -> String {
    let sep = Locale::en.separator();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

pub fn format_money(n: f64) -> String {
    if n < 0.0 {
        format!("-${}", format_number(-n, 0))
    } else {
        format!("${}", format_number(n, 0))
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
