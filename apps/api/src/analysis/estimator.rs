//! Score Estimator: mocked ATS compatibility score for an uploaded resume.
//!
//! There is no document parsing. The score is a fixed formula over the form
//! inputs plus a small random jitter:
//!
//! 1. base 65
//! 2. +10 if any whitespace token of the job title is a known role keyword
//! 3. +15 for 3–8 years of experience, +10 for more than 8
//! 4. +5 for a PDF upload
//! 5. + jitter in [-5, 4]
//! 6. clamp to [0, 100]
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`; `MockAtsScorer` adds the
//! simulated turnaround delay on top of `ScoreEstimator`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::document::DocumentKind;
use crate::analysis::feedback;

const BASE_SCORE: i64 = 65;
const ROLE_KEYWORDS: &[&str] = &["developer", "engineer", "manager", "analyst"];
const ROLE_BONUS: i64 = 10;
const PDF_BONUS: i64 = 5;

/// Inclusive jitter bounds of `RandomJitter`.
pub const JITTER_MIN: i32 = -5;
pub const JITTER_MAX: i32 = 4;

/// Default simulated turnaround.
pub const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub job_title: String,
    pub experience_years: u32,
    pub document_kind: DocumentKind,
}

impl ScoreInput {
    /// Builds an input from raw form text. Unparseable experience reads as 0.
    pub fn from_form(job_title: &str, experience_text: &str, document_kind: DocumentKind) -> Self {
        Self {
            job_title: job_title.to_string(),
            experience_years: parse_experience_years(experience_text),
            document_kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32, // 0 – 100
    pub summary_lines: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Jitter sources
// ────────────────────────────────────────────────────────────────────────────

/// Supplies the per-call score adjustment.
pub trait JitterSource: Send + Sync {
    fn sample(&self) -> i32;
}

/// Uniform over [`JITTER_MIN`, `JITTER_MAX`].
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self) -> i32 {
        rand::thread_rng().gen_range(JITTER_MIN..=JITTER_MAX)
    }
}

/// Always returns the same adjustment. `FixedJitter(0)` disables jitter.
pub struct FixedJitter(pub i32);

impl JitterSource for FixedJitter {
    fn sample(&self) -> i32 {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring rules
// ────────────────────────────────────────────────────────────────────────────

/// Leading-integer parse of free text: `"5 years"` → 5, `"3.9"` → 3.
/// Empty, non-numeric and negative input all read as 0.
pub fn parse_experience_years(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if negative || digits.is_empty() {
        return 0;
    }
    // Only overflow can fail here.
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// True iff a whole, case-insensitive token of the title is a role keyword.
pub fn has_role_keyword(job_title: &str) -> bool {
    job_title
        .split_whitespace()
        .map(str::to_lowercase)
        .any(|word| ROLE_KEYWORDS.contains(&word.as_str()))
}

pub fn experience_bonus(years: u32) -> i64 {
    match years {
        3..=8 => 15,
        y if y > 8 => 10,
        _ => 0,
    }
}

/// Applies the rules with an explicit jitter and clamps to [0, 100].
pub fn compute_score(input: &ScoreInput, jitter: i32) -> u32 {
    let mut score = BASE_SCORE;

    if has_role_keyword(&input.job_title) {
        score += ROLE_BONUS;
    }
    score += experience_bonus(input.experience_years);
    if input.document_kind == DocumentKind::Pdf {
        score += PDF_BONUS;
    }
    score += i64::from(jitter);

    score.clamp(0, 100) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Estimator
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoreEstimator {
    jitter: Arc<dyn JitterSource>,
}

impl ScoreEstimator {
    pub fn new(jitter: Arc<dyn JitterSource>) -> Self {
        Self { jitter }
    }

    /// Estimates from raw form text.
    pub fn estimate(
        &self,
        job_title: &str,
        experience_text: &str,
        document_kind: DocumentKind,
    ) -> ScoreResult {
        self.estimate_input(&ScoreInput::from_form(
            job_title,
            experience_text,
            document_kind,
        ))
    }

    pub fn estimate_input(&self, input: &ScoreInput) -> ScoreResult {
        ScoreResult {
            score: compute_score(input, self.jitter.sample()),
            summary_lines: feedback::summary_lines(
                &input.job_title,
                input.experience_years,
                input.document_kind,
            ),
            strengths: feedback::strengths(),
            improvements: feedback::improvements(),
        }
    }
}

impl Default for ScoreEstimator {
    fn default() -> Self {
        Self::new(Arc::new(RandomJitter))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer trait
// ────────────────────────────────────────────────────────────────────────────

/// Asynchronous scoring backend used by the HTTP layer.
#[async_trait]
pub trait AtsScorer: Send + Sync {
    async fn analyze(
        &self,
        job_title: &str,
        experience_text: &str,
        document_kind: DocumentKind,
    ) -> ScoreResult;
}

/// Wraps `ScoreEstimator` behind a fixed simulated delay. A zero latency
/// returns immediately.
pub struct MockAtsScorer {
    estimator: ScoreEstimator,
    latency: Duration,
}

impl MockAtsScorer {
    pub fn new(estimator: ScoreEstimator, latency: Duration) -> Self {
        Self { estimator, latency }
    }
}

#[async_trait]
impl AtsScorer for MockAtsScorer {
    async fn analyze(
        &self,
        job_title: &str,
        experience_text: &str,
        document_kind: DocumentKind,
    ) -> ScoreResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.estimator.estimate(job_title, experience_text, document_kind)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
