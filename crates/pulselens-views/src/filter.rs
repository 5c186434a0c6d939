//! Free-text and date-range filtering over canonical posts.

use pulselens_core::{normalize_date, Post};

use crate::groups::{AccountGroup, DateGroup};

/// Case-insensitive substring filter over account name, handle, and
/// narrative. A query that is blank after trimming returns the input
/// unchanged.
#[must_use]
pub fn filter_by_text(posts: &[Post], query: &str) -> Vec<Post> {
    if query.trim().is_empty() {
        return posts.to_vec();
    }
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            post.account_name.to_lowercase().contains(&needle)
                || post.handle.to_lowercase().contains(&needle)
                || post.narrative.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Inclusive calendar-date-range filter.
///
/// Bounds are `YYYY-MM-DD` strings; an inverted pair is swapped before
/// filtering. Posts whose start date cannot be normalized are excluded once
/// any bound is set. The matching policy is asymmetric on purpose:
///
/// - both bounds: the post's interval must be fully contained in the filter
///   interval;
/// - only `from`: the post's interval must end at or after it (overlap);
/// - only `to`: the post's interval must start at or before it;
/// - neither: everything passes.
///
/// With one bound the full intersecting activity window is shown; with both
/// bounds only confidently-contained posts are.
#[must_use]
pub fn filter_by_date_range(
    posts: &[Post],
    from: Option<&str>,
    to: Option<&str>,
) -> Vec<Post> {
    let (from, to) = match (from, to) {
        (Some(f), Some(t)) if f > t => (Some(t), Some(f)),
        other => other,
    };

    if from.is_none() && to.is_none() {
        return posts.to_vec();
    }

    posts
        .iter()
        .filter(|post| {
            let post_from = normalize_date(post.group_date());
            if post_from.is_empty() {
                return false;
            }
            let post_to = match normalize_date(&post.date_to) {
                ref t if t.is_empty() => post_from.clone(),
                t => t,
            };

            match (from, to) {
                (Some(f), Some(t)) => post_from.as_str() >= f && post_to.as_str() <= t,
                (Some(f), None) => post_to.as_str() >= f,
                (None, Some(t)) => post_from.as_str() <= t,
                (None, None) => true,
            }
        })
        .cloned()
        .collect()
}

/// Narrows account groups to those whose handle or account name matches the
/// query. Blank queries return the input unchanged.
#[must_use]
pub fn filter_account_groups(groups: &[AccountGroup], query: &str) -> Vec<AccountGroup> {
    if query.trim().is_empty() {
        return groups.to_vec();
    }
    let needle = query.to_lowercase();
    groups
        .iter()
        .filter(|g| {
            g.handle.to_lowercase().contains(&needle)
                || g.account_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Narrows date groups to those whose date key or long-form display date
/// matches the query. Blank queries return the input unchanged.
#[must_use]
pub fn filter_date_groups(groups: &[DateGroup], query: &str) -> Vec<DateGroup> {
    if query.trim().is_empty() {
        return groups.to_vec();
    }
    let needle = query.to_lowercase();
    groups
        .iter()
        .filter(|g| {
            g.date.to_lowercase().contains(&needle)
                || g.display_date.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, from: &str, to: &str) -> Post {
        Post {
            id: id.to_string(),
            account_name: "Example Account".to_string(),
            handle: "@example".to_string(),
            platform: "Twitter".to_string(),
            location: "Unknown".to_string(),
            engagements: 0,
            narrative: "a narrative".to_string(),
            geo_coordinates: String::new(),
            date: from.to_string(),
            date_from: from.to_string(),
            date_to: to.to_string(),
            source: None,
        }
    }

    #[test]
    fn both_bounds_require_containment() {
        let posts = vec![post("a", "2024-01-01", "2024-01-03")];
        // The one-day filter window does not contain the three-day post.
        let kept = filter_by_date_range(&posts, Some("2024-01-02"), Some("2024-01-02"));
        assert!(kept.is_empty());
    }

    #[test]
    fn from_only_uses_overlap() {
        let posts = vec![post("a", "2024-01-01", "2024-01-03")];
        // The same post passes when only the start bound is given.
        let kept = filter_by_date_range(&posts, Some("2024-01-02"), None);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn to_only_checks_post_start() {
        let posts = vec![
            post("a", "2024-01-01", "2024-01-03"),
            post("b", "2024-01-05", "2024-01-06"),
        ];
        let kept = filter_by_date_range(&posts, None, Some("2024-01-04"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn no_bounds_keeps_everything() {
        let posts = vec![post("a", "", ""), post("b", "2024-01-01", "")];
        assert_eq!(filter_by_date_range(&posts, None, None).len(), 2);
    }

    #[test]
    fn undated_posts_drop_once_a_bound_is_set() {
        let posts = vec![post("a", "", ""), post("b", "2024-01-01", "")];
        let kept = filter_by_date_range(&posts, Some("2024-01-01"), None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "b");
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let posts = vec![post("a", "2024-01-02", "2024-01-02")];
        let kept = filter_by_date_range(&posts, Some("2024-01-03"), Some("2024-01-01"));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn missing_date_to_falls_back_to_start() {
        let posts = vec![post("a", "2024-01-02", "")];
        let kept = filter_by_date_range(&posts, Some("2024-01-01"), Some("2024-01-02"));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn text_filter_matches_any_candidate_field() {
        let mut by_name = post("a", "", "");
        by_name.account_name = "Market Watch".to_string();
        let mut by_narrative = post("b", "", "");
        by_narrative.narrative = "markets rally again".to_string();
        let mut neither = post("c", "", "");
        neither.account_name = "Other".to_string();
        neither.handle = "@other".to_string();
        neither.narrative = "nothing here".to_string();

        let posts = vec![by_name, by_narrative, neither];
        let kept = filter_by_text(&posts, "MARKET");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn date_group_search_matches_date_key_case_insensitively() {
        let groups = crate::groups::group_by_date(&[
            post("a", "2024-01-05", ""),
            post("b", "", ""),
        ]);

        let kept = filter_date_groups(&groups, "2024-01");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, "2024-01-05");

        // The undated bucket's key must match regardless of query casing.
        for query in ["Unknown", "UNKNOWN", "unknown"] {
            let kept = filter_date_groups(&groups, query);
            assert_eq!(kept.len(), 1, "query: {query}");
            assert_eq!(kept[0].date, "Unknown");
        }
    }

    #[test]
    fn blank_text_query_is_identity() {
        let posts = vec![post("a", "", ""), post("b", "", "")];
        assert_eq!(filter_by_text(&posts, "").len(), 2);
        assert_eq!(filter_by_text(&posts, "   ").len(), 2);
    }
}
