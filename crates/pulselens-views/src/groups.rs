//! Grouped views over canonical posts: by account, by date, and by recency.
//!
//! Each grouping is pure over its input slice and allocates fresh result
//! collections. Group order reproduces the source views: accounts by
//! descending entry count, dates by descending date key, recency in
//! configured table order. Stable sorts keep first-encountered order among
//! ties.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use pulselens_core::Post;

use crate::keywords::top_keywords;

/// All entries for one account handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountGroup {
    pub handle: String,
    pub account_name: String,
    pub entries: Vec<Post>,
    pub count: usize,
    pub summary: AccountSummary,
}

/// Per-account rollup shown on the group header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    /// `"{min} to {max}"`, a single date, or `"No dates"`.
    pub date_range: String,
    pub total_engagements: u64,
    pub top_keywords: Vec<String>,
}

/// All entries for one primary calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    /// Raw `YYYY-MM-DD` key, or `"Unknown"` for undated posts.
    pub date: String,
    /// Long-form rendering, e.g. `"Friday, January 5, 2024"`.
    pub display_date: String,
    pub entries: Vec<Post>,
    pub count: usize,
    pub summary: DateSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSummary {
    pub total_engagements: u64,
    pub unique_accounts: usize,
    pub top_platforms: Vec<String>,
}

/// Yesterday-and-today entries for one source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableGroup {
    pub table_name: String,
    pub entries: Vec<Post>,
    pub count: usize,
    pub total_engagements: u64,
    pub unique_accounts: usize,
}

/// Groups posts by account handle, most active accounts first.
///
/// The key is the handle, falling back to the account name, falling back to
/// `"Unknown"`. Entries within a group are ordered by descending start date.
#[must_use]
pub fn group_by_account(posts: &[Post]) -> Vec<AccountGroup> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AccountGroup> = Vec::new();

    for post in posts {
        let key = post.account_key().to_string();
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            let account_name = if post.account_name.is_empty() {
                key.clone()
            } else {
                post.account_name.clone()
            };
            groups.push(AccountGroup {
                handle: key,
                account_name,
                entries: Vec::new(),
                count: 0,
                summary: AccountSummary {
                    date_range: String::new(),
                    total_engagements: 0,
                    top_keywords: Vec::new(),
                },
            });
            groups.len() - 1
        });
        groups[slot].entries.push(post.clone());
        groups[slot].count += 1;
    }

    for group in &mut groups {
        group
            .entries
            .sort_by(|a, b| b.group_date().cmp(a.group_date()));
        group.summary = summarize_account(&group.entries);
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

fn summarize_account(entries: &[Post]) -> AccountSummary {
    let mut dates: Vec<&str> = entries
        .iter()
        .map(Post::group_date)
        .filter(|d| !d.is_empty())
        .collect();
    dates.sort_unstable();

    let date_range = match (dates.first(), dates.last()) {
        (Some(min), Some(max)) if min != max => format!("{min} to {max}"),
        (Some(only), _) => (*only).to_string(),
        (None, _) => "No dates".to_string(),
    };

    AccountSummary {
        date_range,
        total_engagements: entries.iter().map(|e| e.engagements).sum(),
        top_keywords: top_keywords(
            entries
                .iter()
                .map(|e| e.narrative.as_str())
                .filter(|n| !n.is_empty()),
            5,
        ),
    }
}

/// Groups posts by primary calendar date, newest dates first.
#[must_use]
pub fn group_by_date(posts: &[Post]) -> Vec<DateGroup> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DateGroup> = Vec::new();

    for post in posts {
        let key = match post.group_date() {
            "" => "Unknown".to_string(),
            d => d.to_string(),
        };
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push(DateGroup {
                display_date: display_date(&key),
                date: key,
                entries: Vec::new(),
                count: 0,
                summary: DateSummary {
                    total_engagements: 0,
                    unique_accounts: 0,
                    top_platforms: Vec::new(),
                },
            });
            groups.len() - 1
        });
        groups[slot].entries.push(post.clone());
        groups[slot].count += 1;
    }

    for group in &mut groups {
        group.summary = summarize_date(&group.entries);
    }

    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}

fn summarize_date(entries: &[Post]) -> DateSummary {
    let unique_accounts: HashSet<&str> = entries.iter().map(|e| e.account_key()).collect();

    let mut platform_order: Vec<String> = Vec::new();
    let mut platform_counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let platform = if entry.platform.is_empty() {
            "Unknown"
        } else {
            &entry.platform
        };
        let count = platform_counts.entry(platform.to_string()).or_insert(0);
        if *count == 0 {
            platform_order.push(platform.to_string());
        }
        *count += 1;
    }
    let mut top_platforms = platform_order;
    top_platforms.sort_by(|a, b| platform_counts[b].cmp(&platform_counts[a]));
    top_platforms.truncate(3);

    DateSummary {
        total_engagements: entries.iter().map(|e| e.engagements).sum(),
        unique_accounts: unique_accounts.len(),
        top_platforms,
    }
}

/// Long-form English rendering of a `YYYY-MM-DD` key.
fn display_date(key: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
        return "Unknown Date".to_string();
    };
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        date.year()
    )
}

/// The process-local UTC calendar date.
#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The Today view: yesterday's and today's posts split by source table.
///
/// Always returns exactly one group per name in `tables`, in that order,
/// whether or not any posts matched. Entries are sorted by descending
/// engagements.
#[must_use]
pub fn group_by_recency(posts: &[Post], tables: &[String], today: NaiveDate) -> Vec<TableGroup> {
    let today_str = today.format("%Y-%m-%d").to_string();
    let yesterday_str = (today - Duration::days(1)).format("%Y-%m-%d").to_string();

    let mut by_table: HashMap<String, Vec<Post>> = HashMap::new();
    for post in posts {
        let date = post.group_date();
        if date != today_str && date != yesterday_str {
            continue;
        }
        let table = post.source.clone().unwrap_or_else(|| "Unknown".to_string());
        by_table.entry(table).or_default().push(post.clone());
    }

    tables
        .iter()
        .map(|name| {
            let mut entries = by_table.remove(name).unwrap_or_default();
            entries.sort_by(|a, b| b.engagements.cmp(&a.engagements));

            let unique: HashSet<&str> = entries.iter().map(|e| e.account_key()).collect();
            TableGroup {
                table_name: name.clone(),
                count: entries.len(),
                total_engagements: entries.iter().map(|e| e.engagements).sum(),
                unique_accounts: unique.len(),
                entries,
            }
        })
        .collect()
}
