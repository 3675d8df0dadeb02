//! The decision-and-persistence core of refind.
//!
//! [`MatchEngine`] turns raw similarity candidates into accept/reject
//! decisions by combining the vector score with the compatibility
//! classifier and the geo gate, then commits accepted pairs through the
//! [`Ledger`] so both parties' match lists name each other. The
//! recheck entry point re-runs the pipeline for an already-ingested item
//! and merges new results without disturbing existing ledger entries.
//!
//! Runs for different source items execute concurrently with no cross-run
//! coordination; the store's atomic keyed append is the only concurrency
//! safeguard, and it makes every write idempotent, so a failed run can be
//! retried in full.

pub mod ledger;
pub mod metrics;
pub mod pipeline;
pub mod recheck;
pub mod types;

pub use ledger::Ledger;
pub use metrics::{set_match_metrics, MatchMetrics};
pub use pipeline::MatchEngine;
pub use types::{MatchConfig, MatchError, MatchOutcome, MatchPair, RejectReason};
