use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when loading or validating taxonomy tables.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// The static tables behind object-type extraction and compatibility
/// classification.
///
/// The tables ship with compiled-in defaults and can be replaced per
/// deployment from a YAML file. Group maps are ordered (`BTreeMap`) so
/// classification scans them in a stable order regardless of load path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaxonomyConfig {
    /// Ordered object keyword table. Earlier entries win on overlap, so
    /// specific tokens ("macbook") must precede generic ones ("computer").
    #[serde(default = "default_object_keywords")]
    pub object_keywords: Vec<String>,

    /// Word-groups of object tokens that name the same kind of thing.
    #[serde(default = "default_semantic_groups")]
    pub semantic_groups: BTreeMap<String, Vec<String>>,

    /// Coarse category taxonomy: group name to member category tags.
    #[serde(default = "default_category_groups")]
    pub category_groups: BTreeMap<String, Vec<String>>,
}

impl TaxonomyConfig {
    /// Load taxonomy tables from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TaxonomyError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse taxonomy tables from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaxonomyError> {
        let config: TaxonomyConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the tables. Every entry must be non-empty lowercase text;
    /// matching is case-insensitive on the input side only.
    pub fn validate(&self) -> Result<(), TaxonomyError> {
        if self.object_keywords.is_empty() {
            return Err(TaxonomyError::Validation(
                "object_keywords must not be empty".to_string(),
            ));
        }
        let all_entries = self
            .object_keywords
            .iter()
            .chain(self.semantic_groups.values().flatten())
            .chain(self.category_groups.values().flatten());
        for entry in all_entries {
            if entry.trim().is_empty() {
                return Err(TaxonomyError::Validation(
                    "taxonomy entries must not be blank".to_string(),
                ));
            }
            if entry.chars().any(|c| c.is_uppercase()) {
                return Err(TaxonomyError::Validation(format!(
                    "taxonomy entry must be lowercase: {entry}"
                )));
            }
        }
        for (name, group) in self.semantic_groups.iter().chain(&self.category_groups) {
            if group.is_empty() {
                return Err(TaxonomyError::Validation(format!(
                    "group must not be empty: {name}"
                )));
            }
        }
        Ok(())
    }

    /// Name of the first semantic group containing `word`, scanning in
    /// stable order.
    pub(crate) fn semantic_group_of(&self, word: &str) -> Option<&str> {
        self.semantic_groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == word))
            .map(|(name, _)| name.as_str())
    }

    /// Name of the first category group containing `category`
    /// (case-insensitive).
    pub(crate) fn category_group_of(&self, category: &str) -> Option<&str> {
        let lowered = category.to_lowercase();
        self.category_groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| *m == lowered))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            object_keywords: default_object_keywords(),
            semantic_groups: default_semantic_groups(),
            category_groups: default_category_groups(),
        }
    }
}

fn default_object_keywords() -> Vec<String> {
    [
        "laptop",
        "macbook",
        "phone",
        "smartphone",
        "cup",
        "mug",
        "bottle",
        "wallet",
        "purse",
        "bag",
        "keys",
        "diary",
        "notebook",
        "umbrella",
        "glasses",
        "watch",
        "charger",
        "headphones",
        "card",
        "ring",
        "camera",
        "tablet",
        "earbuds",
        "book",
        "computer",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_semantic_groups() -> BTreeMap<String, Vec<String>> {
    group_map(&[
        ("bottles", &["bottle", "flask", "tumbler", "container"]),
        ("computers", &["laptop", "macbook", "computer", "notebook"]),
        ("drinkware", &["cup", "mug", "coffee", "tea", "utensils"]),
        ("eyewear", &["glasses", "sunglasses", "spectacles"]),
        ("keys", &["keys", "keychain"]),
        ("phones", &["phone", "mobile", "iphone", "smartphone"]),
        ("reading", &["diary", "notebook", "journal", "book"]),
        ("wallets", &["wallet", "purse"]),
    ])
}

fn default_category_groups() -> BTreeMap<String, Vec<String>> {
    group_map(&[
        (
            "accessories",
            &[
                "accessories",
                "belt",
                "bracelet",
                "earrings",
                "necklace",
                "ring",
                "sunglasses",
            ],
        ),
        (
            "clothing",
            &["clothing", "cap", "coat", "hat", "jacket", "scarf", "shoes", "sweater"],
        ),
        (
            "containers",
            &["containers", "bottle", "cup", "flask", "lunchbox", "mug", "tumbler"],
        ),
        (
            "documents",
            &["documents", "books", "card", "diary", "id", "notebook", "passport", "stationery"],
        ),
        (
            "electronics",
            &[
                "electronics",
                "camera",
                "charger",
                "gadgets",
                "headphones",
                "laptop",
                "phone",
                "tablet",
            ],
        ),
        (
            "personal_items",
            &[
                "personal_items",
                "bag",
                "glasses",
                "jewellery",
                "keys",
                "purse",
                "umbrella",
                "wallet",
                "watch",
            ],
        ),
    ])
}

fn group_map(groups: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    groups
        .iter()
        .map(|(name, members)| {
            (
                name.to_string(),
                members.iter().map(|m| m.to_string()).collect(),
            )
        })
        .collect()
}
