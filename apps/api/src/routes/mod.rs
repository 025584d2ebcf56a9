pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/llm/ping", get(health::llm_ping_handler))
        // Resume API
        .route("/api/v1/resumes/parse", post(resume::handle_parse))
        .route("/api/v1/resumes/upload", post(resume::handle_upload))
        .route("/api/v1/resumes/enhance", post(resume::handle_enhance))
        .route("/api/v1/resumes/score", post(resume::handle_score))
        .route("/api/v1/resumes/analyze", post(resume::handle_analyze))
        .route("/api/v1/resumes/match", post(resume::handle_match))
        .route(
            "/api/v1/resumes/cover-letter",
            post(resume::handle_cover_letter),
        )
        .route(
            "/api/v1/resumes/export/ats",
            post(resume::handle_export_ats),
        )
        // Jobs API
        .route("/api/v1/jobs/search", post(jobs::handle_search))
        .with_state(state)
}
