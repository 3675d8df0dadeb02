//! HTTP trigger surface for the refind matching core.
//!
//! Two triggers start pipeline runs: the item-created event
//! (`POST /v1/items`) runs ingestion and the first similarity check, and
//! the manual recheck (`POST /v1/items/{kind}/{id}/recheck`) re-runs the
//! pipeline for an already-processed item. Presentation concerns (UI,
//! maps, auth) live elsewhere; this server only exposes the core.
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - liveness probe
//! - `GET /ready` - readiness probe
//! - `POST /v1/items` - item-created event
//! - `POST /v1/items/{kind}/{id}/recheck` - manual recheck

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::start_server;
pub use state::ServerState;
