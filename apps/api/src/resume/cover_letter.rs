//! Cover letter drafting from a resume and a job description.

use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::recovery::{recover_json, JsonShape};
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::resume::{CoverLetter, JobDescription, ResumeData};
use crate::resume::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};

const COVER_LETTER_MAX_TOKENS: u32 = 1500;

pub const ERROR_TEXT: &str = "Error generating cover letter. Please try again later.";

pub async fn generate_cover_letter(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    job: &JobDescription,
    company_info: &str,
) -> CoverLetter {
    match request_cover_letter(llm, resume, job, company_info).await {
        Ok(letter) if !letter.cover_letter.trim().is_empty() => letter,
        Ok(_) => {
            warn!("Cover letter reply had no letter text");
            fallback()
        }
        Err(e) => {
            warn!("Error generating cover letter: {e}");
            fallback()
        }
    }
}

async fn request_cover_letter(
    llm: &dyn LlmProvider,
    resume: &ResumeData,
    job: &JobDescription,
    company_info: &str,
) -> anyhow::Result<CoverLetter> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let job_json = serde_json::to_string_pretty(job)?;
    let company_info = if company_info.trim().is_empty() {
        "None provided."
    } else {
        company_info
    };
    let prompt = render(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("job_json", &job_json),
            ("company_info", company_info),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let request =
        CompletionRequest::new(COVER_LETTER_SYSTEM, prompt).max_tokens(COVER_LETTER_MAX_TOKENS);
    let text = llm.complete(&request).await?;
    Ok(recover_json(&text, JsonShape::Object)?)
}

fn fallback() -> CoverLetter {
    CoverLetter {
        cover_letter: ERROR_TEXT.to_string(),
        highlights: vec![],
        keywords: vec![],
    }
}

/// Download name for the letter, e.g. `Cover_Letter_Jane_Doe.txt`.
pub fn cover_letter_file_name(resume: &ResumeData) -> String {
    let stem = resume.file_stem();
    if stem.is_empty() {
        "Cover_Letter.txt".to_string()
    } else {
        format!("Cover_Letter_{stem}.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;

    #[tokio::test]
    async fn test_cover_letter_parsed() {
        let llm = ScriptedLlm::replying(&[r#"<think>draft</think>{
            "coverLetter": "Dear Hiring Manager,\n\nI am excited...",
            "highlights": ["Led migration to Rust"],
            "keywords": ["Rust", "Kafka"]
        }"#]);
        let letter = generate_cover_letter(
            &llm,
            &ResumeData::default(),
            &JobDescription::default(),
            "Remote-first culture",
        )
        .await;
        assert!(letter.cover_letter.starts_with("Dear Hiring Manager"));
        assert_eq!(letter.keywords.len(), 2);

        let request = llm.requests.lock().unwrap()[0].clone();
        assert!(request.prompt.contains("Remote-first culture"));
        assert_eq!(request.max_tokens, 1500);
    }

    #[tokio::test]
    async fn test_blank_company_info_is_marked() {
        let llm = ScriptedLlm::replying(&[r#"{"coverLetter": "Hi"}"#]);
        generate_cover_letter(&llm, &ResumeData::default(), &JobDescription::default(), "  ").await;
        assert!(llm.requests.lock().unwrap()[0].prompt.contains("None provided."));
    }

    #[tokio::test]
    async fn test_empty_letter_falls_back() {
        let llm = ScriptedLlm::replying(&[r#"{"highlights": ["x"]}"#]);
        let letter =
            generate_cover_letter(&llm, &ResumeData::default(), &JobDescription::default(), "").await;
        assert_eq!(letter.cover_letter, ERROR_TEXT);
        assert!(letter.highlights.is_empty());
    }

    #[tokio::test]
    async fn test_error_falls_back() {
        let llm = ScriptedLlm::failing(429, "rate limited");
        let letter =
            generate_cover_letter(&llm, &ResumeData::default(), &JobDescription::default(), "").await;
        assert_eq!(letter.cover_letter, ERROR_TEXT);
    }

    #[test]
    fn test_file_name_uses_candidate_name() {
        let mut resume = ResumeData::default();
        resume.personal_info.name = "Jane Q Doe".to_string();
        assert_eq!(cover_letter_file_name(&resume), "Cover_Letter_Jane_Q_Doe.txt");
        assert_eq!(cover_letter_file_name(&ResumeData::default()), "Cover_Letter.txt");
    }
}
