use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use item::{Item, ItemKind, ItemStore};

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// Item-created event: the upstream ingestion surface posts the full
/// record here once the reporter has submitted it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreatedEvent {
    pub kind: ItemKind,
    pub id: String,
    pub item: Item,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreatedResponse {
    pub item_id: String,
    pub accepted_count: usize,
}

/// Handle the item-created trigger: persist the record, run ingestion
/// (image analysis, summary, embedding, index upsert), then the first
/// similarity check. Re-delivered events are no-ops: when the store
/// already holds the item, ingestion runs against the stored record so
/// the embedding-id guard sees any earlier enrichment.
pub async fn create_item(
    State(state): State<Arc<ServerState>>,
    Json(event): Json<ItemCreatedEvent>,
) -> ServerResult<impl IntoResponse> {
    if event.id.trim().is_empty() {
        return Err(ServerError::BadRequest("id must not be empty".into()));
    }
    if event.id != event.item.id || event.kind != event.item.kind {
        return Err(ServerError::BadRequest(
            "event id/kind must match the item record".into(),
        ));
    }

    let item = match state
        .store
        .read(event.kind, &event.id)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
    {
        Some(stored) => stored,
        None => {
            state
                .store
                .insert(event.item.clone())
                .map_err(|e| ServerError::Internal(e.to_string()))?;
            event.item
        }
    };

    let outcome = state.ingest.process_item_created(&item).await?;

    Ok(Json(ItemCreatedResponse {
        item_id: event.id,
        accepted_count: outcome.accepted,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecheckResponse {
    pub accepted_count: usize,
}

/// Handle the manual recheck trigger for an already-processed item.
pub async fn recheck_item(
    State(state): State<Arc<ServerState>>,
    Path((kind, id)): Path<(String, String)>,
) -> ServerResult<impl IntoResponse> {
    let kind: ItemKind = kind
        .parse()
        .map_err(|e: String| ServerError::BadRequest(e))?;

    let accepted_count = state.engine.recheck(kind, &id).await?;
    Ok(Json(RecheckResponse { accepted_count }))
}
