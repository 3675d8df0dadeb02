use std::collections::BTreeSet;

use crate::config::TaxonomyConfig;
use crate::extract::extract_object_type;

/// Why a pair was judged compatible (or not). Returned alongside the
/// boolean so the pipeline and observability tooling see the deciding
/// signal instead of a bare yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatReason {
    /// Both extracted object types share a word longer than three chars.
    SharedToken(String),
    /// Both extracted object types hit the same semantic word-group.
    SemanticGroup(String),
    /// Category tags are equal, ignoring case.
    ExactCategory,
    /// Both category tags sit in the same taxonomy bucket.
    CategoryGroup(String),
    /// No signal agreed.
    NoSignal,
}

/// Outcome of a compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatDecision {
    pub compatible: bool,
    pub reason: CompatReason,
}

impl CompatDecision {
    fn yes(reason: CompatReason) -> Self {
        Self {
            compatible: true,
            reason,
        }
    }

    fn no() -> Self {
        Self {
            compatible: false,
            reason: CompatReason::NoSignal,
        }
    }
}

/// Decide whether two reports plausibly describe the same kind of object.
///
/// Signals are tried most-specific first: image-derived text evidence
/// (shared tokens, then semantic word-groups), then the exact category tag,
/// then the coarse category taxonomy. The returned boolean is symmetric
/// under swapping source and target.
pub fn classify_compatibility(
    source_category: &str,
    target_category: &str,
    source_description: Option<&str>,
    target_description: Option<&str>,
    taxonomy: &TaxonomyConfig,
) -> CompatDecision {
    let source_type = source_description
        .map(|d| extract_object_type(d, taxonomy))
        .unwrap_or_default();
    let target_type = target_description
        .map(|d| extract_object_type(d, taxonomy))
        .unwrap_or_default();

    if !source_type.is_empty() && !target_type.is_empty() {
        if let Some(token) = shared_token(&source_type, &target_type) {
            return CompatDecision::yes(CompatReason::SharedToken(token));
        }
        if let Some(group) = shared_semantic_group(&source_type, &target_type, taxonomy) {
            return CompatDecision::yes(CompatReason::SemanticGroup(group));
        }
    }

    if !source_category.is_empty() && source_category.eq_ignore_ascii_case(target_category) {
        return CompatDecision::yes(CompatReason::ExactCategory);
    }

    if let (Some(source_group), Some(target_group)) = (
        taxonomy.category_group_of(source_category),
        taxonomy.category_group_of(target_category),
    ) {
        if source_group == target_group {
            return CompatDecision::yes(CompatReason::CategoryGroup(source_group.to_string()));
        }
    }

    CompatDecision::no()
}

/// Smallest word longer than three chars present in both object types.
/// Picking the ordered-set minimum keeps the reason independent of
/// argument order.
fn shared_token(source_type: &str, target_type: &str) -> Option<String> {
    let source_words: BTreeSet<&str> = significant_words(source_type).collect();
    significant_words(target_type)
        .filter(|w| source_words.contains(w))
        .min()
        .map(str::to_string)
}

fn shared_semantic_group(
    source_type: &str,
    target_type: &str,
    taxonomy: &TaxonomyConfig,
) -> Option<String> {
    taxonomy
        .semantic_groups
        .iter()
        .find(|(_, members)| {
            let hit =
                |ty: &str| ty.split_whitespace().any(|w| members.iter().any(|m| m == w));
            hit(source_type) && hit(target_type)
        })
        .map(|(name, _)| name.clone())
}

fn significant_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().filter(|w| w.len() > 3)
}
