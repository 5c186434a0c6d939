//! Keyword extraction from narrative text.

use std::collections::HashMap;

/// English stop words excluded from keyword ranking.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "as", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "shall", "can", "need", "dare", "ought",
    "used", "that", "this", "these", "those", "with", "from", "by", "about", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "again", "further", "then",
    "once", "here", "there", "when", "where", "why", "how", "all", "each", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "just", "also", "now", "him", "his", "her", "he", "she", "it", "its", "they", "them",
    "their", "who", "which", "what", "whose",
];

/// Ranks the most frequent meaningful words across the given narratives.
///
/// Text is lowercased, punctuation is stripped, and tokens of length three or
/// less or in the stop-word list are dropped. Ties rank in first-encountered
/// order.
#[must_use]
pub fn top_keywords<'a, I>(narratives: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for narrative in narratives {
        let cleaned: String = narrative
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();

        for word in cleaned.split_whitespace() {
            if word.len() <= 3 || STOP_WORDS.contains(&word) {
                continue;
            }
            let entry = counts.entry(word.to_string()).or_insert(0);
            if *entry == 0 {
                order.push(word.to_string());
            }
            *entry += 1;
        }
    }

    // Stable sort keeps first-encountered order among equal counts.
    let mut ranked = order;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.truncate(limit);
    ranked
}
