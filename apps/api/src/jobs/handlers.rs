use axum::{extract::State, Json};
use serde::Deserialize;

use crate::jobs::search::find_jobs;
use crate::models::jobs::{JobListing, JobSearchParams};
use crate::models::resume::ResumeData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchRequest {
    #[serde(default)]
    pub search_params: JobSearchParams,
    #[serde(default)]
    pub resume_data: Option<ResumeData>,
}

/// POST /api/v1/jobs/search
///
/// The resume only shapes the prompt when `searchParams.useResume` is set.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<JobSearchRequest>,
) -> Json<Vec<JobListing>> {
    let resume = request
        .resume_data
        .as_ref()
        .filter(|_| request.search_params.use_resume);
    Json(find_jobs(state.llm.as_ref(), &request.search_params, resume).await)
}
