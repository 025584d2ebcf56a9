//! Resume enhancement: rewrites a resume for a target job and scores the result.
//!
//! This is the one flow that re-prompts: if the first reply cannot be recovered,
//! a stricter formatter prompt is sent once before giving up.

use serde::Deserialize;
use tracing::{info, warn};

use crate::llm_client::prompts::{render, JSON_FORMATTER_SYSTEM, JSON_ONLY_INSTRUCTION};
use crate::llm_client::recovery::{recover_json_with_rung, JsonShape};
use crate::llm_client::{CompletionRequest, LlmError, LlmProvider};
use crate::models::null_as_default;
use crate::models::resume::{clamp_score, JobTarget, ResumeData, ResumeEnhancementResult};
use crate::resume::prompts::{
    ENHANCE_PROMPT_TEMPLATE, ENHANCE_RETRY_PROMPT_TEMPLATE, ENHANCE_SYSTEM,
};

pub const UNRECOVERABLE_FEEDBACK: &str = "We encountered an issue enhancing your resume. \
    Please try again or make manual improvements based on the job description.";
pub const UNRECOVERABLE_SCORE: f64 = 50.0;

pub const ERROR_FEEDBACK: &str =
    "We encountered an error while processing your resume. Please try again later.";

/// Model reply. `enhancedResume` stays optional so a reply that only carries
/// feedback keeps the caller's resume instead of blanking it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnhancementReply {
    #[serde(default)]
    enhanced_resume: Option<ResumeData>,
    #[serde(default, deserialize_with = "null_as_default")]
    feedback: String,
    #[serde(default, deserialize_with = "null_as_default")]
    score: f64,
}

/// Enhances `resume` for `target`. Never fails: unrecoverable replies and
/// transport errors both yield the original resume with canned feedback.
pub async fn enhance_resume(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    target: &JobTarget,
) -> ResumeEnhancementResult {
    match try_enhance(llm, resume, target).await {
        Ok(Some(result)) => result,
        Ok(None) => ResumeEnhancementResult {
            enhanced_resume: resume.clone(),
            feedback: UNRECOVERABLE_FEEDBACK.to_string(),
            score: UNRECOVERABLE_SCORE,
        },
        Err(e) => {
            warn!("Error enhancing resume: {e}");
            ResumeEnhancementResult {
                enhanced_resume: resume.clone(),
                feedback: ERROR_FEEDBACK.to_string(),
                score: 0.0,
            }
        }
    }
}

async fn try_enhance(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    target: &JobTarget,
) -> Result<Option<ResumeEnhancementResult>, LlmError> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let target_json = serde_json::to_string_pretty(target)?;

    let prompt = render(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("target_json", &target_json),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let text = llm
        .complete(&CompletionRequest::new(ENHANCE_SYSTEM, prompt))
        .await?;

    match recover_json_with_rung::<EnhancementReply>(&text, JsonShape::Object) {
        Ok((result, rung)) => {
            info!("Enhancement reply recovered ({rung:?})");
            return Ok(Some(finish(result, resume)));
        }
        Err(e) => warn!("Failed to recover enhancement reply: {e}; retrying with stricter prompt"),
    }

    let retry_prompt = render(
        ENHANCE_RETRY_PROMPT_TEMPLATE,
        &[("resume_json", &resume_json), ("target_json", &target_json)],
    );
    let retry_text = llm
        .complete(&CompletionRequest::new(JSON_FORMATTER_SYSTEM, retry_prompt))
        .await?;

    match recover_json_with_rung::<EnhancementReply>(&retry_text, JsonShape::Object) {
        Ok((result, rung)) => {
            info!("Enhancement retry recovered ({rung:?})");
            Ok(Some(finish(result, resume)))
        }
        Err(e) => {
            warn!("Failed to recover enhancement retry: {e}");
            Ok(None)
        }
    }
}

fn finish(reply: EnhancementReply, original: &ResumeData) -> ResumeEnhancementResult {
    let enhanced_resume = match reply.enhanced_resume {
        Some(enhanced) => enhanced.normalize(),
        None => {
            warn!("Enhancement reply had no enhancedResume; keeping the submitted resume");
            original.clone()
        }
    };
    ResumeEnhancementResult {
        enhanced_resume,
        feedback: reply.feedback,
        score: clamp_score(reply.score),
    }
}
