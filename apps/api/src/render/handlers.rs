use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{ExportAdapter, PreviewAdapter, PreviewDocument};
use crate::models::resume::ResumeRecord;
use crate::render::sections::SectionId;
use crate::render::validation::{describe, validate_submission};
use crate::render::{render_resume, RenderedResume};
use crate::state::AppState;

pub const OVERFLOW_HEADER: HeaderName = HeaderName::from_static("x-resume-overflow");

/// Everything outside RFC 5987 `attr-char` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksResponse {
    pub selected_sections: Vec<SectionId>,
    #[serde(flatten)]
    pub rendered: RenderedResume,
}

fn check_submission(record: &ResumeRecord) -> Result<(), AppError> {
    let errors = validate_submission(record);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(describe(&errors)))
    }
}

/// POST /api/v1/resume/blocks
pub async fn handle_blocks(
    Json(record): Json<ResumeRecord>,
) -> Result<Json<BlocksResponse>, AppError> {
    check_submission(&record)?;
    let rendered = render_resume(&record);
    Ok(Json(BlocksResponse {
        selected_sections: rendered.section_ids(),
        rendered,
    }))
}

/// POST /api/v1/resume/preview
pub async fn handle_preview(
    Json(record): Json<ResumeRecord>,
) -> Result<Json<PreviewDocument>, AppError> {
    check_submission(&record)?;
    let preview = PreviewAdapter::new().preview(&render_resume(&record));
    Ok(Json(preview))
}

/// POST /api/v1/resume/export
///
/// Responds with the PDF itself as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Response, AppError> {
    check_submission(&record)?;

    let rendered = render_resume(&record);
    let exported = ExportAdapter::new(state.page_config.clone()).export(&rendered)?;
    info!(
        file_name = %exported.file_name,
        bytes = exported.bytes.len(),
        overflowed = exported.overflowed,
        "resume exported"
    );

    let disposition = HeaderValue::from_str(&content_disposition(&exported.file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (
                OVERFLOW_HEADER,
                HeaderValue::from_static(if exported.overflowed { "true" } else { "false" }),
            ),
        ],
        Bytes::from(exported.bytes),
    )
        .into_response())
}

/// `attachment` with an ASCII `filename` plus an RFC 5987 `filename*` for the
/// exact UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, ATTR_CHAR);
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
