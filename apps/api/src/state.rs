use std::sync::Arc;

use crate::analysis::estimator::AtsScorer;
use crate::stats::aggregator::StatsAggregator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable scorer. Default: MockAtsScorer with the configured delay and jitter.
    pub scorer: Arc<dyn AtsScorer>,
    /// Single stats service for the process; every handler sees the same record.
    pub stats: Arc<StatsAggregator>,
}
