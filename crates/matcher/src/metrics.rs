// Run-level metrics hooks.
//
// A deployment installs one global `MatchMetrics` recorder at startup via
// [`set_match_metrics`]; every `MatchEngine` then reports its runs to it.
// No metrics backend is hardwired here.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use item::ItemKind;

/// Metrics observer for pipeline runs.
pub trait MatchMetrics: Send + Sync {
    /// Record one completed run: the source item's kind, wall-clock
    /// duration, and how many pairs the run newly committed.
    fn record_run(&self, kind: ItemKind, latency: Duration, accepted: usize);
}

fn recorder_cell() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static RECORDER: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    RECORDER.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = recorder_cell()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global run recorder. Call once at startup, before
/// engines start taking traffic; `None` disables reporting.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = recorder_cell()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
