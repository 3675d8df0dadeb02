use crate::config::TaxonomyConfig;

/// Reduce free-text image analysis to a canonical lowercase object token.
///
/// Scans the first line of the text against the ordered keyword table and
/// returns the first table entry the line contains, so specific entries
/// shadow generic ones. When no keyword matches, the fallback is the text
/// up to the first period, lowercased and trimmed. Empty or whitespace
/// input yields the empty string. Total and deterministic.
pub fn extract_object_type(text: &str, taxonomy: &TaxonomyConfig) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let first_line = trimmed.lines().next().unwrap_or_default().to_lowercase();
    for keyword in &taxonomy.object_keywords {
        if first_line.contains(keyword.as_str()) {
            return keyword.clone();
        }
    }

    trimmed
        .to_lowercase()
        .split('.')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
