//! Axum route handlers for the resume API.

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{
    CoverLetter, JobDescription, JobMatch, JobTarget, ResumeAnalysis, ResumeData,
    ResumeEnhancementResult, ResumeScore,
};
use crate::resume::analysis::{
    analyze_resume, match_job_description, section_feedback, ResumeSection,
};
use crate::resume::ats::{ats_file_name, render_ats_text};
use crate::resume::cover_letter::{cover_letter_file_name, generate_cover_letter};
use crate::resume::enhance::enhance_resume;
use crate::resume::parser::parse_resume;
use crate::resume::scoring::score_resume;
use crate::resume::upload::{extract_upload_text, validate_resume_text};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedResumeRequest {
    pub resume_data: ResumeData,
    pub job_target: JobTarget,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_data: ResumeData,
    #[serde(default)]
    pub section: Option<ResumeSection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: ResumeAnalysis,
    pub section_feedback: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub resume_data: ResumeData,
    pub job_description: JobDescription,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub resume_data: ResumeData,
    pub job_description: JobDescription,
    #[serde(default)]
    pub company_info: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    #[serde(flatten)]
    pub letter: CoverLetter,
    pub file_name: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeData>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText must not be empty".to_string()));
    }
    validate_resume_text(&request.resume_text)?;
    Ok(Json(parse_resume(state.llm.as_ref(), &request.resume_text).await))
}

/// POST /api/v1/resumes/upload
///
/// Multipart upload with a single `file` field (PDF or plain text).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeData>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        info!("Resume upload '{}' ({} bytes)", file_name, data.len());
        let text = extract_upload_text(&file_name, content_type.as_deref(), data).await?;
        return Ok(Json(parse_resume(state.llm.as_ref(), &text).await));
    }

    Err(AppError::Validation(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// POST /api/v1/resumes/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(request): Json<TargetedResumeRequest>,
) -> Json<ResumeEnhancementResult> {
    Json(enhance_resume(state.llm.as_ref(), &request.resume_data, &request.job_target).await)
}

/// POST /api/v1/resumes/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<TargetedResumeRequest>,
) -> Json<ResumeScore> {
    Json(score_resume(state.llm.as_ref(), &request.resume_data, &request.job_target).await)
}

/// POST /api/v1/resumes/analyze
///
/// When `section` is given, also returns the recommendations that apply to it.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let analysis = analyze_resume(state.llm.as_ref(), &request.resume_data).await;
    let section_feedback = request
        .section
        .map(|section| section_feedback(&analysis, section))
        .unwrap_or_default();
    Json(AnalyzeResponse {
        analysis,
        section_feedback,
    })
}

/// POST /api/v1/resumes/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<JobMatch> {
    Json(
        match_job_description(
            state.llm.as_ref(),
            &request.resume_data,
            &request.job_description,
        )
        .await,
    )
}

/// POST /api/v1/resumes/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Json<CoverLetterResponse> {
    let letter = generate_cover_letter(
        state.llm.as_ref(),
        &request.resume_data,
        &request.job_description,
        &request.company_info,
    )
    .await;
    Json(CoverLetterResponse {
        letter,
        file_name: cover_letter_file_name(&request.resume_data),
    })
}

/// POST /api/v1/resumes/export/ats
///
/// Returns the resume as a plain-text attachment.
pub async fn handle_export_ats(Json(resume): Json<ResumeData>) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        ats_file_name(&resume).replace('"', "")
    ))
    .context("building Content-Disposition header")?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_ats_text(&resume),
    )
        .into_response())
}
