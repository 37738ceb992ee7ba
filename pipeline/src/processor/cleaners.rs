//! Field-level cleaning rules carried over from the legacy load process.
//! These must stay bit-for-bit stable (including the scientific-notation
//! phone case and the exact punctuation whitelist) so already-loaded rows
//! and new rows normalize identically.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Everything outside ASCII letters, digits, whitespace, comma, period, hyphen.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s,.-]").unwrap());

/// Normalizes a free-text field (names, addresses). Null, empty, and the
/// literal "NULL" all become the empty string. Underscores turn into spaces
/// before the whitelist strip, whitespace runs collapse to single spaces.
pub fn clean_text(value: Option<&str>) -> String {
    let Some(text) = value else {
        return String::new();
    };
    if text.is_empty() || text.trim().eq_ignore_ascii_case("null") {
        return String::new();
    }

    let spaced = text.replace('_', " ");
    let stripped = DISALLOWED.replace_all(&spaced, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the last 10 digits of a phone field, or all of them when fewer
/// are present. Spreadsheet exports sometimes render phone columns in
/// scientific notation ("9.87654321E9"); those are re-read as numbers and
/// expanded to a plain integer string before digit extraction.
pub fn clean_phone(value: Option<&str>) -> String {
    let Some(phone) = value else {
        return String::new();
    };

    let mut text = phone.to_string();
    if text.contains('e') || text.contains('E') {
        if let Ok(number) = text.trim().parse::<f64>() {
            if number.is_finite() {
                text = format!("{}", number.trunc() as i128);
            }
        }
    }

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Parses a date field in any of the commonly seen representations and
/// standardizes it. Unparseable values become `None`, never an error.
pub fn clean_date(value: Option<&str>) -> Option<NaiveDate> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }

    None
}
