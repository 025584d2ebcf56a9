//! Resume analysis and job-description matching.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::recovery::{recover_json, JsonShape};
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::resume::{clamp_score, JobDescription, JobMatch, ResumeAnalysis, ResumeData};
use crate::resume::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM,
};

const ANALYSIS_MAX_TOKENS: u32 = 1000;
const MATCH_MAX_TOKENS: u32 = 1000;

/// Builder section a recommendation can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeSection {
    PersonalInfo,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl ResumeSection {
    fn keywords(self) -> &'static [&'static str] {
        match self {
            ResumeSection::PersonalInfo => &["contact", "personal"],
            ResumeSection::Summary => &["summary", "objective"],
            ResumeSection::Experience => &["experience", "work"],
            ResumeSection::Education => &["education", "academic"],
            ResumeSection::Skills => &["skill", "technology"],
            ResumeSection::Projects => &["project", "portfolio"],
        }
    }
}

/// Recommendations that mention the given section.
pub fn section_feedback(analysis: &ResumeAnalysis, section: ResumeSection) -> Vec<String> {
    let keywords = section.keywords();
    analysis
        .recommendations
        .iter()
        .filter(|r| {
            let lower = r.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .cloned()
        .collect()
}

fn analysis_fallback() -> ResumeAnalysis {
    ResumeAnalysis {
        score: 0.0,
        strengths: vec!["Error analyzing resume".to_string()],
        improvements: vec!["Please try again later".to_string()],
        keywords: vec![],
        recommendations: vec![],
    }
}

fn match_fallback() -> JobMatch {
    JobMatch {
        experience_alignment: "Error matching job description".to_string(),
        ..Default::default()
    }
}

pub async fn analyze_resume(llm: &dyn LlmProvider, resume: &ResumeData) -> ResumeAnalysis {
    match request_analysis(llm, resume).await {
        Ok(mut analysis) => {
            analysis.score = clamp_score(analysis.score);
            analysis
        }
        Err(e) => {
            warn!("Error analyzing resume: {e}");
            analysis_fallback()
        }
    }
}

async fn request_analysis(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
) -> anyhow::Result<ResumeAnalysis> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let prompt = render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("resume_json", &resume_json), ("json_only", JSON_ONLY_INSTRUCTION)],
    );
    let text = llm
        .complete(&CompletionRequest::new(ANALYSIS_SYSTEM, prompt).max_tokens(ANALYSIS_MAX_TOKENS))
        .await?;
    Ok(recover_json(&text, JsonShape::Object)?)
}

pub async fn match_job_description(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    job: &JobDescription,
) -> JobMatch {
    match request_match(llm, resume, job).await {
        Ok(mut job_match) => {
            job_match.match_score = clamp_score(job_match.match_score);
            job_match
        }
        Err(e) => {
            warn!("Error matching job: {e}");
            match_fallback()
        }
    }
}

async fn request_match(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    job: &JobDescription,
) -> anyhow::Result<JobMatch> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let job_json = serde_json::to_string_pretty(job)?;
    let prompt = render(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("job_json", &job_json),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let text = llm
        .complete(&CompletionRequest::new(MATCH_SYSTEM, prompt).max_tokens(MATCH_MAX_TOKENS))
        .await?;
    Ok(recover_json(&text, JsonShape::Object)?)
}
