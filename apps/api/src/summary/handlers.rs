use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::summary::service::GeneratedSummary;

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/generate-summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(req): Json<GenerateSummaryRequest>,
) -> Result<Json<GeneratedSummary>, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }
    Ok(Json(state.summaries.generate(&req.prompt).await))
}

/// POST /api/v1/resume/summary
pub async fn handle_summarize_record(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Json<GeneratedSummary> {
    Json(state.summaries.summarize_record(&record).await)
}
