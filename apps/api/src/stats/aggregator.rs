//! Stats Aggregator: read/transform/write over a single persisted record.
//!
//! The record lives under one fixed key. Reads are fail-soft (anything
//! unreadable becomes the zero record) and writes are best-effort (a failed
//! write is logged, the computed record is still returned to the caller).

use std::sync::{Arc, Mutex};

use tracing::{debug, error, warn};

use crate::stats::record::{StatsRecord, MAX_AVERAGE_IMPROVEMENT, MAX_SUCCESS_RATE};
use crate::stats::store::KeyValueStore;

/// Storage key of the stats record.
pub const STATS_KEY: &str = "resume-stats";

/// Score at or above which an analysis counts toward the success rate.
const SUCCESS_THRESHOLD: u32 = 70;
/// Scores above this baseline count as improvement.
const IMPROVEMENT_BASELINE: u32 = 50;

pub struct StatsAggregator {
    store: Arc<dyn KeyValueStore>,
    /// Serialises read-modify-write within this process.
    update_lock: Mutex<()>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            update_lock: Mutex::new(()),
        }
    }

    /// Returns the persisted record, or the zero record if it is absent,
    /// malformed, or the store cannot be read.
    pub fn query(&self) -> StatsRecord {
        let raw = match self.store.get(STATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StatsRecord::default(),
            Err(e) => {
                warn!("Error reading resume stats: {e}");
                return StatsRecord::default();
            }
        };

        StatsRecord::parse(&raw).unwrap_or_else(|| {
            warn!("Stored resume stats are malformed; using defaults");
            StatsRecord::default()
        })
    }

    /// Folds one analysis score into the running aggregates and persists the
    /// whole record.
    pub fn update(&self, score: u32) -> StatsRecord {
        // A poisoned lock only means another update panicked mid-way; the
        // stored record is still whole.
        let _guard = self
            .update_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next = fold_score(self.query(), score);

        match serde_json::to_string(&next) {
            Ok(serialized) => {
                if let Err(e) = self.store.set(STATS_KEY, &serialized) {
                    error!("Error saving resume stats: {e}");
                }
            }
            Err(e) => error!("Error serializing resume stats: {e}"),
        }

        debug!(
            resumes_analyzed = next.resumes_analyzed,
            average_score_improvement = next.average_score_improvement,
            success_rate = next.success_rate,
            "Resume stats updated"
        );
        next
    }
}

/// Incremental weighted-average update of `prev` with one more score.
pub fn fold_score(prev: StatsRecord, score: u32) -> StatsRecord {
    let score = score.min(100);
    let n = u64::from(prev.resumes_analyzed);
    let next_n = n + 1;

    let improvement = u64::from(score.saturating_sub(IMPROVEMENT_BASELINE));
    let success = if score >= SUCCESS_THRESHOLD { 100 } else { 0 };

    let average_score_improvement = round_div(
        u64::from(prev.average_score_improvement) * n + improvement,
        next_n,
    )
    .min(u64::from(MAX_AVERAGE_IMPROVEMENT));
    let success_rate =
        round_div(u64::from(prev.success_rate) * n + success, next_n).min(u64::from(MAX_SUCCESS_RATE));

    StatsRecord {
        resumes_analyzed: prev.resumes_analyzed.saturating_add(1),
        // Both are bounded by their caps above, so they fit in u32.
        average_score_improvement: average_score_improvement as u32,
        success_rate: success_rate as u32,
    }
}

/// `round(numerator / denominator)` with halves rounded up. Non-negative only.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}
