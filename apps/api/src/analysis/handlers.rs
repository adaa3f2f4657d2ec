//! Axum route handlers for the Analysis API.

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::document::{validate_submission, UploadRejection, UploadedDocument};
use crate::analysis::feedback::ScoreBand;
use crate::analysis::notice::Notice;
use crate::errors::AppError;
use crate::state::AppState;
use crate::stats::record::StatsRecord;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw multipart form. Every field is optional here so the validator can
/// report a single "missing information" rejection.
#[derive(Debug, Default)]
struct AnalyzeForm {
    job_title: Option<String>,
    experience: Option<String>,
    document: Option<UploadedDocument>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub score: u32,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub summary_lines: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub stats: StatsRecord,
    pub notice: Notice,
    pub upload_notice: Notice,
    pub analyzed_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart fields: `job_title`, `experience`, `document` (file part).
/// Validate → score (after the simulated delay) → fold the score into the
/// running stats.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_form(multipart?).await?;

    let document_kind = validate_submission(
        form.job_title.as_deref(),
        form.experience.as_deref(),
        form.document.as_ref(),
    )?;

    let upload_notice = match &form.document {
        Some(document) => {
            info!(
                file_name = %document.file_name,
                size = document.data.len(),
                kind = document_kind.label(),
                "Document accepted"
            );
            Notice::file_uploaded(&document.file_name)
        }
        None => return Err(UploadRejection::MissingInformation.into()),
    };

    let job_title = form.job_title.unwrap_or_default().trim().to_string();
    let experience = form.experience.unwrap_or_default();

    // Run on its own task so a panicking scorer surfaces as "Analysis failed"
    // instead of dropping the connection.
    let scorer = state.scorer.clone();
    let result = tokio::spawn(async move {
        scorer
            .analyze(&job_title, &experience, document_kind)
            .await
    })
    .await
    .context("Analysis task failed")?;

    // The store is synchronous and may hit disk.
    let stats_service = state.stats.clone();
    let score = result.score;
    let stats = tokio::task::spawn_blocking(move || stats_service.update(score))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in stats update: {e}"))
        })?;
    let band = ScoreBand::from_score(result.score);

    info!(
        score = result.score,
        band = band.label(),
        resumes_analyzed = stats.resumes_analyzed,
        "Analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        analysis_id: Uuid::new_v4(),
        score: result.score,
        band,
        band_label: band.label(),
        summary_lines: result.summary_lines,
        strengths: result.strengths,
        improvements: result.improvements,
        stats,
        notice: Notice::analysis_complete(result.score),
        upload_notice,
        analyzed_at: Utc::now(),
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_title" => form.job_title = Some(field.text().await?),
            "experience" => form.experience = Some(field.text().await?),
            "document" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let media_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                form.document = Some(UploadedDocument {
                    file_name,
                    media_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}
