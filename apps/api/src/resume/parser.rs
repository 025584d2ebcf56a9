//! Resume parser: turns raw resume text into `ResumeData`.
//!
//! The LLM does the heavy lifting. Long inputs are cut down section by section
//! before prompting, and when the model is unreachable or its reply cannot be
//! recovered the text is mined with regexes instead.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::llm_client::prompts::render;
use crate::llm_client::recovery::{recover_json, JsonShape};
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::resume::ResumeData;
use crate::resume::prompts::{PARSE_PROMPT_TEMPLATE, PARSE_SYSTEM};

/// Roughly 3000 tokens of English text.
pub const MAX_PROMPT_CHARS: usize = 4000;
const PARSE_MAX_TOKENS: u32 = 2000;
const NAME_SCAN_LINES: usize = 5;

const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work", "employment"];
const EDUCATION_KEYWORDS: &[&str] = &["education", "academic", "university"];
const SKILLS_KEYWORDS: &[&str] = &["skills", "technologies", "competencies"];

const SKILL_KEYWORDS: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "C++",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "HTML",
    "CSS",
    "SQL",
    "NoSQL",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Git",
    "Agile",
    "Scrum",
    "Project Management",
    "Leadership",
    "Communication",
];

static SECTION_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid section regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,3}[-.\s]?)?(\d{3}[-.\s]?\d{3}[-.\s]?\d{4})").expect("valid phone regex")
});

static PHONE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone regex"));

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"linkedin\.com/in/[a-zA-Z0-9_-]+").expect("valid linkedin regex")
});

/// Parses resume text with the LLM, degrading to regex extraction on failure.
pub async fn parse_resume(llm: &dyn LlmProvider, resume_text: &str) -> ResumeData {
    let truncated = truncate_resume_text(resume_text, MAX_PROMPT_CHARS);
    info!(
        "Parsing resume: original length {}, truncated length {}",
        resume_text.chars().count(),
        truncated.chars().count()
    );

    let prompt = render(PARSE_PROMPT_TEMPLATE, &[("resume_text", &truncated)]);
    let request = CompletionRequest::new(PARSE_SYSTEM, prompt).max_tokens(PARSE_MAX_TOKENS);

    match llm.complete(&request).await {
        Ok(text) => match recover_json::<ResumeData>(&text, JsonShape::Object) {
            Ok(parsed) => parsed.normalize(),
            Err(e) => {
                warn!("Could not recover resume JSON ({e}); using basic extraction");
                extract_basic_resume_info(resume_text)
            }
        },
        Err(e) if e.is_context_overflow() => {
            warn!("Token limit exceeded ({e}); falling back to basic extraction");
            extract_basic_resume_info(resume_text)
        }
        Err(e) => {
            warn!("Error parsing resume: {e}");
            ResumeData::default()
        }
    }
}

/// Shrinks resume text to `max_len` characters, keeping the most useful sections.
///
/// Priority: the first block (contact details), experience, education, skills,
/// then everything else in document order while it fits.
pub fn truncate_resume_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let sections: Vec<&str> = SECTION_BREAK.split(text).collect();
    let mut included = vec![false; sections.len()];
    let mut result = String::new();

    append_section(&mut result, &mut included, &sections, 0);

    let experience = find_section_index(&sections, EXPERIENCE_KEYWORDS);
    let education = find_section_index(&sections, EDUCATION_KEYWORDS);
    let skills = find_section_index(&sections, SKILLS_KEYWORDS);

    // Experience goes in regardless of size; the final cut handles overflow.
    if let Some(idx) = experience {
        append_section(&mut result, &mut included, &sections, idx);
    }

    for idx in [education, skills].into_iter().flatten() {
        if fits(&result, sections[idx], max_len) {
            append_section(&mut result, &mut included, &sections, idx);
        }
    }

    for idx in 0..sections.len() {
        if fits(&result, sections[idx], max_len) {
            append_section(&mut result, &mut included, &sections, idx);
        }
    }

    truncate_chars(&result, max_len)
}

fn append_section(result: &mut String, included: &mut [bool], sections: &[&str], idx: usize) {
    if included[idx] {
        return;
    }
    result.push_str(sections[idx]);
    result.push_str("\n\n");
    included[idx] = true;
}

fn fits(result: &str, section: &str, max_len: usize) -> bool {
    result.chars().count() + section.chars().count() < max_len
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Index of the first section mentioning any keyword, case-insensitively.
pub fn find_section_index(sections: &[&str], keywords: &[&str]) -> Option<usize> {
    sections.iter().position(|section| {
        let lower = section.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

/// Pulls contact details and well-known skills out of raw text without an LLM.
pub fn extract_basic_resume_info(resume_text: &str) -> ResumeData {
    let mut result = ResumeData::default();

    let lines: Vec<&str> = resume_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(name) = lines
        .iter()
        .take(NAME_SCAN_LINES)
        .find(|l| !l.contains('@') && !PHONE_LIKE.is_match(l))
    {
        result.personal_info.name = name.to_string();
    }

    if let Some(m) = EMAIL.find(resume_text) {
        result.personal_info.email = m.as_str().to_string();
    }

    if let Some(m) = PHONE.find(resume_text) {
        result.personal_info.phone = m.as_str().to_string();
    }

    if let Some(m) = LINKEDIN.find(resume_text) {
        result.personal_info.linkedin = m.as_str().to_string();
    }

    let lower = resume_text.to_lowercase();
    let skills: Vec<String> = SKILL_KEYWORDS
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect();
    if !skills.is_empty() {
        result.skills = skills;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedLlm;

    const SAMPLE_RESUME: &str = "Jane Doe\n\
        jane.doe@example.com | 555-123-4567 | linkedin.com/in/jane-doe\n\
        \n\
        Experience\n\
        Senior Engineer at Acme, built React and Node.js services on AWS.\n\
        \n\
        Education\n\
        BSc Computer Science, State University\n\
        \n\
        Skills\n\
        Python, Docker, Kubernetes, Git\n";

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(truncate_resume_text("short resume", 100), "short resume");
    }

    #[test]
    fn test_truncation_prioritises_contact_and_experience() {
        let contact = "John Smith\njohn@example.com";
        let hobbies = format!("Hobbies\n{}", "chess ".repeat(40));
        let experience = format!("Work Experience\n{}", "shipped things ".repeat(10));
        let text = format!("{contact}\n\n{hobbies}\n\n{experience}");

        let out = truncate_resume_text(&text, 250);
        assert!(out.chars().count() <= 250);
        assert!(out.starts_with(contact));
        let exp_pos = out.find("Work Experience").expect("experience kept");
        assert!(out.find("Hobbies").map_or(true, |h| h > exp_pos));
    }

    #[test]
    fn test_truncation_skips_sections_that_do_not_fit() {
        let text = format!(
            "Name\n\nExperience\nAcme\n\nEducation\n{}\n\nSkills\nRust",
            "x".repeat(500)
        );
        let out = truncate_resume_text(&text, 100);
        assert!(out.contains("Experience"));
        assert!(out.contains("Skills\nRust"));
        assert!(!out.contains("xxxx"));
    }

    #[test]
    fn test_truncation_hard_cuts_on_char_boundary() {
        let text = format!("{}\n\nExperience {}", "é".repeat(50), "ü".repeat(200));
        let out = truncate_resume_text(&text, 120);
        assert_eq!(out.chars().count(), 120);
    }

    #[test]
    fn test_truncation_does_not_duplicate_first_section() {
        let text = format!("Work experience summary {}\n\nOther", "y".repeat(100));
        let out = truncate_resume_text(&text, 80);
        assert_eq!(out.matches("Work experience").count(), 1);
    }

    #[test]
    fn test_find_section_index_is_case_insensitive() {
        let sections = ["Contact", "PROFESSIONAL EXPERIENCE", "Education"];
        assert_eq!(find_section_index(&sections, EXPERIENCE_KEYWORDS), Some(1));
        assert_eq!(find_section_index(&sections, EDUCATION_KEYWORDS), Some(2));
        assert_eq!(find_section_index(&sections, &["hobbies"]), None);
    }

    #[test]
    fn test_basic_extraction_finds_contact_fields() {
        let data = extract_basic_resume_info(SAMPLE_RESUME);
        assert_eq!(data.personal_info.name, "Jane Doe");
        assert_eq!(data.personal_info.email, "jane.doe@example.com");
        assert_eq!(data.personal_info.phone, "555-123-4567");
        assert_eq!(data.personal_info.linkedin, "linkedin.com/in/jane-doe");
    }

    #[test]
    fn test_basic_extraction_skips_contact_lines_for_name() {
        let text = "alice@example.com\n555-123-4567\nAlice Walker\nEngineer";
        let data = extract_basic_resume_info(text);
        assert_eq!(data.personal_info.name, "Alice Walker");
        assert_eq!(data.personal_info.phone, "555-123-4567");
    }

    #[test]
    fn test_basic_extraction_collects_known_skills() {
        let data = extract_basic_resume_info(SAMPLE_RESUME);
        for skill in ["React", "Node.js", "AWS", "Python", "Docker", "Kubernetes", "Git"] {
            assert!(data.skills.iter().any(|s| s == skill), "missing {skill}");
        }
        assert!(!data.skills.iter().any(|s| s == "Azure"));
    }

    #[test]
    fn test_basic_extraction_keeps_placeholder_without_skills() {
        let data = extract_basic_resume_info("Bob\nGardener");
        assert_eq!(data.skills, vec![String::new()]);
        assert_eq!(data.experience.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_resume_uses_model_json() {
        let llm = ScriptedLlm::replying(&[
            r#"Here you go: {"personalInfo": {"name": "Jane Doe"}, "skills": ["Rust"], "experience": []}"#,
        ]);
        let data = parse_resume(&llm, SAMPLE_RESUME).await;
        assert_eq!(data.personal_info.name, "Jane Doe");
        assert_eq!(data.skills, vec!["Rust".to_string()]);
        assert_eq!(data.experience.len(), 1);
        assert_eq!(llm.requests.lock().unwrap()[0].max_tokens, 2000);
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back_to_basic_extraction() {
        let llm = ScriptedLlm::replying(&["I could not parse this resume, sorry."]);
        let data = parse_resume(&llm, SAMPLE_RESUME).await;
        assert_eq!(data.personal_info.email, "jane.doe@example.com");
        assert!(data.skills.iter().any(|s| s == "Docker"));
    }

    #[tokio::test]
    async fn test_token_limit_error_falls_back_to_basic_extraction() {
        let llm = ScriptedLlm::failing(413, "Request too large for model");
        let data = parse_resume(&llm, SAMPLE_RESUME).await;
        assert_eq!(data.personal_info.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_other_errors_return_default_resume() {
        let llm = ScriptedLlm::failing(401, "Invalid API Key");
        let data = parse_resume(&llm, SAMPLE_RESUME).await;
        assert_eq!(data, ResumeData::default());
    }

    #[tokio::test]
    async fn test_long_input_is_truncated_before_prompting() {
        let llm = ScriptedLlm::replying(&["{}"]);
        let long_text = format!("{SAMPLE_RESUME}\n\n{}", "filler ".repeat(2000));
        parse_resume(&llm, &long_text).await;
        let prompt = llm.requests.lock().unwrap()[0].prompt.clone();
        assert!(!prompt.contains(&"filler ".repeat(700)));
        assert!(prompt.contains("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_null_fields_in_model_json_are_tolerated() {
        let llm = ScriptedLlm::replying(&[r#"{
            "personalInfo": {"name": "Jane Doe", "website": null},
            "summary": null,
            "experience": [{"title": "Staff Engineer", "company": "Acme", "achievements": null}],
            "projects": null,
            "skills": ["Rust"]
        }"#]);
        let resume = parse_resume(&llm, SAMPLE_RESUME).await;
        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.personal_info.website, "");
        assert_eq!(resume.experience[0].title, "Staff Engineer");
        assert_eq!(resume.experience[0].achievements, vec![String::new()]);
        assert_eq!(resume.skills, vec!["Rust".to_string()]);
        assert_eq!(resume.projects.len(), 1);
    }
}
