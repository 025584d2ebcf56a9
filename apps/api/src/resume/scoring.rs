//! Resume scoring against a target job (ATS-style 0–100 score plus feedback).

use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::recovery::{recover_json, JsonShape};
use crate::llm_client::{CompletionRequest, LlmError, LlmProvider};
use crate::models::resume::{clamp_score, JobTarget, ResumeData, ResumeScore};
use crate::resume::prompts::{SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};

pub const UNRECOVERABLE_FEEDBACK: &str = "We encountered an issue scoring your resume. \
    Please try again or make manual improvements based on the job description.";
pub const UNRECOVERABLE_SCORE: f64 = 50.0;

pub const ERROR_FEEDBACK: &str =
    "We encountered an error while processing your resume. Please try again later.";

pub async fn score_resume(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    target: &JobTarget,
) -> ResumeScore {
    let text = match request_score(llm, resume, target).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Error scoring resume: {e}");
            return ResumeScore {
                score: 0.0,
                feedback: ERROR_FEEDBACK.to_string(),
            };
        }
    };

    match recover_json::<ResumeScore>(&text, JsonShape::Object) {
        Ok(scored) => ResumeScore {
            score: clamp_score(scored.score),
            feedback: scored.feedback,
        },
        Err(e) => {
            warn!("Failed to recover score reply: {e}");
            ResumeScore {
                score: UNRECOVERABLE_SCORE,
                feedback: UNRECOVERABLE_FEEDBACK.to_string(),
            }
        }
    }
}

async fn request_score(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    target: &JobTarget,
) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let target_json = serde_json::to_string_pretty(target)?;
    let prompt = render(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("target_json", &target_json),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    llm.complete(&CompletionRequest::new(SCORE_SYSTEM, prompt))
        .await
}
