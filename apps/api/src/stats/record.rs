use serde::{Deserialize, Serialize};

/// Upper bound of `average_score_improvement`.
pub const MAX_AVERAGE_IMPROVEMENT: u32 = 50;
/// Upper bound of `success_rate`.
pub const MAX_SUCCESS_RATE: u32 = 100;

/// Running aggregates over every completed analysis. No raw history is kept.
///
/// Serialized with camelCase keys so the stored value stays a flat object
/// readable by the browser UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub resumes_analyzed: u32,
    pub average_score_improvement: u32, // 0 – 50
    pub success_rate: u32,              // 0 – 100
}

impl StatsRecord {
    /// Parses a stored value. Any value that does not deserialize, or whose
    /// aggregates fall outside their ranges, is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let record: StatsRecord = serde_json::from_str(raw).ok()?;
        record.is_in_range().then_some(record)
    }

    pub fn is_in_range(&self) -> bool {
        self.average_score_improvement <= MAX_AVERAGE_IMPROVEMENT
            && self.success_rate <= MAX_SUCCESS_RATE
    }

    /// Landing-page rendering of the three counters.
    pub fn display(&self) -> StatsDisplay {
        StatsDisplay {
            resumes_analyzed: self.resumes_analyzed.to_string(),
            average_score_improvement: format!("{}%", self.average_score_improvement),
            success_rate: format!("{}%", self.success_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsDisplay {
    pub resumes_analyzed: String,
    pub average_score_improvement: String,
    pub success_rate: String,
}
