//! CSV export of filtered posts and Today-view groups.
//!
//! The CSV is assembled by hand: header line plus one line per post, text
//! fields double-quoted with embedded quotes doubled. This is a write-only
//! sink; nothing in the system parses it back.

use chrono::NaiveDate;

use pulselens_core::Post;

use crate::groups::TableGroup;

/// Column order of the report export.
const REPORT_HEADERS: [&str; 10] = [
    "ID",
    "Account Name",
    "Handle",
    "Platform",
    "Location",
    "Geo Coordinates",
    "Engagements",
    "Narrative",
    "Date From",
    "Date To",
];

/// Column order of the Today-view export.
const TODAY_HEADERS: [&str; 8] = [
    "Table",
    "Handle",
    "Account",
    "Platform",
    "Engagements",
    "Narrative",
    "Date",
    "Location",
];

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Renders the main report export: header plus one row per post.
#[must_use]
pub fn report_csv(posts: &[Post]) -> String {
    let mut lines = Vec::with_capacity(posts.len() + 1);
    lines.push(REPORT_HEADERS.join(","));

    for post in posts {
        lines.push(
            [
                post.id.clone(),
                quote(&post.account_name),
                post.handle.clone(),
                post.platform.clone(),
                quote(&post.location),
                quote(&post.geo_coordinates),
                post.engagements.to_string(),
                quote(&post.narrative),
                post.date_from.clone(),
                post.date_to.clone(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// File name for the main report export, embedding the active view name and
/// the current date.
#[must_use]
pub fn report_filename(view: &str, date: NaiveDate) -> String {
    format!("PulseLens_Report_{view}_{}.csv", date.format("%Y-%m-%d"))
}

/// Renders the Today-view export: all table groups flattened, one row per
/// entry.
#[must_use]
pub fn today_csv(groups: &[TableGroup]) -> String {
    let mut lines = Vec::new();
    lines.push(TODAY_HEADERS.join(","));

    for group in groups {
        for entry in &group.entries {
            lines.push(
                [
                    quote(entry.source.as_deref().unwrap_or("")),
                    quote(&entry.handle),
                    quote(&entry.account_name),
                    quote(&entry.platform),
                    entry.engagements.to_string(),
                    quote(&entry.narrative),
                    quote(entry.group_date()),
                    quote(&entry.location),
                ]
                .join(","),
            );
        }
    }

    lines.join("\n")
}

/// File name for the Today-view export.
#[must_use]
pub fn today_filename(date: NaiveDate) -> String {
    format!("PulseLens_Today_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            account_name: "News Desk".to_string(),
            handle: "@news".to_string(),
            platform: "Twitter".to_string(),
            location: "Lahore, Pakistan".to_string(),
            engagements: 42,
            narrative: "Markets rally".to_string(),
            geo_coordinates: "31.5, 74.3".to_string(),
            date: "2024-01-05".to_string(),
            date_from: "2024-01-05".to_string(),
            date_to: "2024-01-06".to_string(),
            source: Some("FM".to_string()),
        }
    }

    /// Splits one CSV line on commas outside double quotes.
    fn split_unquoted(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        for c in line.chars() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    fields.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        fields.push(current);
        fields
    }

    #[test]
    fn report_has_header_plus_one_line_per_post() {
        let posts = vec![post("1"), post("2"), post("3")];
        let csv = report_csv(&posts);
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("ID,Account Name,Handle,"));
    }

    #[test]
    fn every_report_row_has_ten_fields() {
        let posts = vec![post("1")];
        let csv = report_csv(&posts);
        for line in csv.lines() {
            assert_eq!(split_unquoted(line).len(), 10, "line: {line}");
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let mut p = post("1");
        p.narrative = r#"She said "markets up""#.to_string();
        let csv = report_csv(&[p]);
        assert!(csv.contains(r#""She said ""markets up""""#));
    }

    #[test]
    fn commas_inside_text_fields_stay_quoted() {
        let posts = vec![post("1")];
        let csv = report_csv(&posts);
        let row = csv.lines().nth(1).unwrap();
        let fields = split_unquoted(row);
        assert_eq!(fields[4], "Lahore, Pakistan");
        assert_eq!(fields[5], "31.5, 74.3");
    }

    #[test]
    fn filenames_embed_view_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            report_filename("FM", date),
            "PulseLens_Report_FM_2024-01-05.csv"
        );
        assert_eq!(today_filename(date), "PulseLens_Today_2024-01-05.csv");
    }

    #[test]
    fn today_export_flattens_groups() {
        let group = TableGroup {
            table_name: "FM".to_string(),
            entries: vec![post("1"), post("2")],
            count: 2,
            total_engagements: 84,
            unique_accounts: 1,
        };
        let empty = TableGroup {
            table_name: "PTI".to_string(),
            entries: Vec::new(),
            count: 0,
            total_engagements: 0,
            unique_accounts: 0,
        };

        let csv = today_csv(&[group, empty]);
        assert_eq!(csv.lines().count(), 3);
        let fields = split_unquoted(csv.lines().nth(1).unwrap());
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], "FM");
        assert_eq!(fields[6], "2024-01-05");
    }
}
