use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the ledger a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    /// The kind a report of this kind is matched against.
    pub fn opposite(self) -> Self {
        match self {
            ItemKind::Lost => ItemKind::Found,
            ItemKind::Found => ItemKind::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Lost => "lost",
            ItemKind::Found => "found",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(ItemKind::Lost),
            "found" => Ok(ItemKind::Found),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Reporter-supplied position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Review state of a proposed match. The core only ever writes `Pending`;
/// the confirm/decline transitions belong to an external capability and the
/// other variants exist so stored records round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

/// One persisted entry in an item's match ledger, naming the opposite-kind
/// item it was paired with. Field names follow the document store's wire
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Id of the opposite-kind item.
    pub item_id: String,
    /// Owner of the opposite-kind item.
    pub user_id: String,
    /// Similarity score in [0, 1] at decision time.
    pub score: f32,
    /// Kind of the opposite item.
    pub kind: ItemKind,
    #[serde(default)]
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    /// The opposite item's category at decision time.
    #[serde(default)]
    pub category: String,
}

/// A lost or found report as stored by the upstream document store.
///
/// Ingestion sets `image_analysis`, `semantic_description` and
/// `embedding_id` exactly once; the `matches` list is append-only and
/// mutated only through [`ItemStore::append_match`](crate::ItemStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub raw_description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_analysis: Option<String>,
    #[serde(default)]
    pub semantic_description: Option<String>,
    #[serde(default)]
    pub embedding_id: Option<String>,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl Item {
    /// Minimal report used as a starting point by tests and fixtures.
    pub fn new(id: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            kind,
            user_id: None,
            name: String::new(),
            category: String::new(),
            raw_description: String::new(),
            location: None,
            location_description: None,
            coordinates: None,
            image_url: None,
            image_analysis: None,
            semantic_description: None,
            embedding_id: None,
            last_checked_at: None,
            matches: Vec::new(),
        }
    }

    /// True if the match list already names `item_id`.
    pub fn has_match(&self, item_id: &str) -> bool {
        self.matches.iter().any(|m| m.item_id == item_id)
    }

    /// The canonical text the embedding is computed from.
    ///
    /// Ingestion and recheck both call this, so the query vector of a
    /// recheck is built from exactly the text that was embedded at
    /// ingestion time. The image analysis is repeated so it dominates the
    /// embedding; the category header anchors the object type.
    pub fn embedding_input(&self) -> String {
        let image_analysis = self.image_analysis.as_deref().unwrap_or("");
        let semantic = self.semantic_description.as_deref().unwrap_or("");
        let location = self.location.as_deref().unwrap_or("Unknown");
        let location_details = self.location_description.as_deref().unwrap_or("None");
        let coordinates = match &self.coordinates {
            Some(c) => format!("{}, {}", c.lat, c.lng),
            None => "Unknown".to_string(),
        };

        format!(
            "OBJECT TYPE: {category}\n\
             \n\
             IMAGE ANALYSIS:\n{image_analysis}\n\
             \n\
             IMAGE ANALYSIS (REPEATED):\n{image_analysis}\n\
             \n\
             IMAGE ANALYSIS (REPEATED):\n{image_analysis}\n\
             \n\
             SEMANTIC SUMMARY:\n{semantic}\n\
             \n\
             ITEM NAME: {name}\n\
             \n\
             USER DESCRIPTION:\n{raw}\n\
             \n\
             LOCATION: {location}\n\
             LOCATION DETAILS: {location_details}\n\
             COORDINATES: {coordinates}\n",
            category = self.category,
            name = self.name,
            raw = self.raw_description,
        )
    }
}
