//! Heuristic compatibility signals for lost & found pairing.
//!
//! Everything in this crate is static and deterministic: an ordered keyword
//! table turns free-text image analysis into a canonical object token, a
//! fixed set of word-groups and a category taxonomy decide whether two
//! reports plausibly describe the same kind of thing, and a haversine gate
//! rejects pairs that are physically too far apart. The tables live in
//! [`TaxonomyConfig`] so deployments can swap them without code changes.

pub mod compat;
pub mod config;
pub mod extract;
pub mod geo;

pub use compat::{classify_compatibility, CompatDecision, CompatReason};
pub use config::{TaxonomyConfig, TaxonomyError};
pub use extract::extract_object_type;
pub use geo::{geo_gate, haversine_km, GeoDecision, GeoReason, EARTH_RADIUS_KM};
