//! Normalization of raw table rows into canonical [`Post`] values.
//!
//! Rows arrive with arbitrary key casing and optional fields, so every target
//! field is resolved by probing an ordered list of synonym keys; the first
//! non-empty hit wins and every field has a documented default. Normalization
//! is total: it never fails, whatever the row looks like.

use regex::Regex;
use serde_json::Value;

use crate::model::Post;

/// Synonym probes per canonical field, in priority order.
const ID_KEYS: &[&str] = &["id", "ID"];
const ACCOUNT_KEYS: &[&str] = &["account", "Account", "account_name", "Account_Name"];
const HANDLE_KEYS: &[&str] = &["handle", "Handle", "account", "Account"];
const PLATFORM_KEYS: &[&str] = &["platform", "Platform"];
const LOCATION_KEYS: &[&str] = &["location", "Location"];
const ENGAGEMENT_KEYS: &[&str] = &["engagement", "Engagement", "engagements", "Engagements"];
const NARRATIVE_KEYS: &[&str] = &["narrative", "Narrative", "message", "Message"];
const GEO_KEYS: &[&str] = &["geo_coordinates", "Geo_Coordinates", "coordinates"];
const DATE_FROM_KEYS: &[&str] = &["Date_From", "date_from", "DateFrom", "dateFrom"];
const DATE_TO_KEYS: &[&str] = &["Date_To", "date_to", "DateTo", "dateTo"];
const DATE_FALLBACK_KEYS: &[&str] = &["date", "Date", "created_at"];

/// Returns the first non-empty value among `keys`, stringified.
///
/// Empty strings and the number zero count as absent, matching the loose
/// presence check the upstream rows were written against.
fn resolve(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match row.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => {
                if n.as_f64().unwrap_or(0.0) != 0.0 {
                    return Some(n.to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalizes a raw date string to `YYYY-MM-DD` calendar form.
///
/// A string that already is a bare `YYYY-MM-DD` comes back unchanged; a
/// datetime with a leading `YYYY-MM-DD` is truncated to it; anything else
/// becomes the empty string. Idempotent.
#[must_use]
pub fn normalize_date(s: &str) -> String {
    let s = s.trim();
    let re = Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid date regex");
    match re.captures(s) {
        Some(caps) => caps[1].to_string(),
        None => String::new(),
    }
}

/// Best-effort whitespace repair for narrative text that lost its spaces
/// during an upstream transformation.
///
/// Inputs that already contain a space are assumed correct and returned
/// unchanged. Otherwise three passes run in order, each on the previous
/// pass's output: a space after sentence punctuation, a space at lowercase
/// to uppercase boundaries, and a space between letters and adjacent digits.
/// This is a heuristic, not a tokenizer; legitimate camelCase tokens will be
/// split.
#[must_use]
pub fn restore_spaces(s: &str) -> String {
    if s.is_empty() || s.contains(' ') {
        return s.to_string();
    }
    let punct = Regex::new(r#"([,;:.!?])(["'`’‘”“A-Za-z0-9])"#).expect("valid punctuation regex");
    let camel = Regex::new(r"([a-z\p{Ll}])([A-Z\p{Lu}])").expect("valid camel-case regex");
    let letter_digit = Regex::new(r"([A-Za-z])([0-9])").expect("valid letter-digit regex");
    let digit_letter = Regex::new(r"([0-9])([A-Za-z])").expect("valid digit-letter regex");

    let t = punct.replace_all(s, "$1 $2");
    let t = camel.replace_all(&t, "$1 $2");
    let t = letter_digit.replace_all(&t, "$1 $2");
    let t = digit_letter.replace_all(&t, "$1 $2");
    t.into_owned()
}

/// Coerces a raw engagement value to a count.
///
/// Mirrors leading-integer parsing: an optional sign followed by digits,
/// ignoring any trailing junk. Unparseable input yields 0, and negative
/// values clamp to 0 so the count is always non-negative.
fn parse_engagements(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let lead: String = digits.chars().take_while(char::is_ascii_digit).collect();
    if negative || lead.is_empty() {
        return 0;
    }
    lead.parse().unwrap_or(0)
}

/// Converts one raw table row into a canonical [`Post`].
///
/// `source` is the table the row came from and `index` its position in the
/// fetched set; both feed the synthesized fallbacks for missing ids, account
/// names, and handles. The `source` field itself is left unset here — the
/// all-sources fetch path attaches it.
#[must_use]
pub fn normalize_row(row: &Value, source: &str, index: usize) -> Post {
    let raw_date_from = resolve(row, DATE_FROM_KEYS).unwrap_or_default();
    let raw_date_to = resolve(row, DATE_TO_KEYS).unwrap_or_default();
    // Primary date prefers the explicit range start, then the range end,
    // then the row's plain date columns.
    let raw_date_primary = if raw_date_from.is_empty() {
        if raw_date_to.is_empty() {
            resolve(row, DATE_FALLBACK_KEYS).unwrap_or_default()
        } else {
            raw_date_to.clone()
        }
    } else {
        raw_date_from.clone()
    };

    let raw_narrative = resolve(row, NARRATIVE_KEYS).unwrap_or_default();

    Post {
        id: resolve(row, ID_KEYS).unwrap_or_else(|| format!("{source}-{index}")),
        account_name: resolve(row, ACCOUNT_KEYS).unwrap_or_else(|| format!("Account {index}")),
        handle: resolve(row, HANDLE_KEYS).unwrap_or_else(|| format!("@user{index}")),
        platform: resolve(row, PLATFORM_KEYS).unwrap_or_else(|| "Twitter".to_string()),
        location: resolve(row, LOCATION_KEYS).unwrap_or_else(|| "Unknown".to_string()),
        engagements: resolve(row, ENGAGEMENT_KEYS)
            .map_or(0, |raw| parse_engagements(&raw)),
        narrative: restore_spaces(&raw_narrative),
        geo_coordinates: resolve(row, GEO_KEYS).unwrap_or_default(),
        date: normalize_date(&raw_date_primary),
        date_from: normalize_date(&raw_date_from),
        date_to: normalize_date(&raw_date_to),
        source: None,
    }
}
