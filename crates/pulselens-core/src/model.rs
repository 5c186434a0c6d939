use serde::{Deserialize, Serialize};

/// A normalized social-media mention, independent of its raw source schema.
///
/// Date fields hold either the empty string or a strict `YYYY-MM-DD` string;
/// the system compares dates lexicographically, which is chronological for
/// that format. A `Post` is built once per fetch and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique within one source table; synthesized as `"{source}-{index}"`
    /// when the row carries no id.
    pub id: String,
    pub account_name: String,
    pub handle: String,
    /// Platform label as supplied upstream (`Twitter`, `Facebook`, ...).
    /// Defaults to `Twitter` when absent.
    pub platform: String,
    pub location: String,
    pub engagements: u64,
    /// Free text, whitespace-repaired when the raw value had no spaces.
    pub narrative: String,
    /// Raw `"lat, lon"` text, not validated.
    pub geo_coordinates: String,
    /// Primary date, derived from `date_from`/`date_to`/row fallbacks.
    pub date: String,
    pub date_from: String,
    pub date_to: String,
    /// Originating table name; attached only on the all-sources fetch path.
    pub source: Option<String>,
}

impl Post {
    /// The date used for grouping and recency checks: explicit start date
    /// when present, else the primary date.
    #[must_use]
    pub fn group_date(&self) -> &str {
        if self.date_from.is_empty() {
            &self.date
        } else {
            &self.date_from
        }
    }

    /// The key used for account grouping: handle, falling back to the
    /// account name, falling back to `"Unknown"`.
    #[must_use]
    pub fn account_key(&self) -> &str {
        if !self.handle.is_empty() {
            &self.handle
        } else if !self.account_name.is_empty() {
            &self.account_name
        } else {
            "Unknown"
        }
    }
}
