use serde::{Deserialize, Serialize};

use crate::analysis::document::DocumentKind;

const STRENGTHS: [&str; 3] = [
    "Professional document structure detected",
    "Keywords aligned with job requirements",
    "Appropriate experience level for role",
];

const IMPROVEMENTS: [&str; 3] = [
    "Consider adding more industry-specific keywords",
    "Include quantifiable achievements",
    "Optimize section headers for ATS parsing",
];

/// Echo of the submitted inputs, one line each.
pub fn summary_lines(job_title: &str, experience_years: u32, kind: DocumentKind) -> Vec<String> {
    vec![
        format!("Resume analyzed for {job_title} position"),
        format!("Experience level: {experience_years} years"),
        format!("Document format: {}", kind.label()),
    ]
}

pub fn strengths() -> Vec<String> {
    STRENGTHS.iter().map(|s| s.to_string()).collect()
}

pub fn improvements() -> Vec<String> {
    IMPROVEMENTS.iter().map(|s| s.to_string()).collect()
}

/// Display band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 60 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}
