// All LLM prompt constants for the resume features.
// Placeholders are filled with llm_client::prompts::render.

pub const PARSE_SYSTEM: &str = "You are a resume parser that extracts key information from resumes. \
    Be concise and focus on the most important details.";

/// Replace `{resume_text}`.
pub const PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from this resume text and format it as JSON.

RESUME TEXT:
{resume_text}

Return ONLY a JSON object with this structure:
{
  "personalInfo": {
    "name": "",
    "email": "",
    "phone": "",
    "location": "",
    "linkedin": "",
    "website": ""
  },
  "summary": "",
  "experience": [
    {
      "title": "",
      "company": "",
      "location": "",
      "startDate": "",
      "endDate": "",
      "description": "",
      "achievements": [""]
    }
  ],
  "education": [
    {
      "degree": "",
      "institution": "",
      "location": "",
      "graduationDate": "",
      "gpa": "",
      "achievements": [""]
    }
  ],
  "skills": [""],
  "projects": [
    {
      "name": "",
      "description": "",
      "technologies": [""],
      "link": ""
    }
  ]
}"#;

pub const ENHANCE_SYSTEM: &str = "You are an expert resume writer and career coach specializing in \
    optimizing resumes for specific job targets. You provide detailed, actionable feedback and make \
    strategic improvements to resumes. You ALWAYS respond with valid JSON only.";

/// Replace `{resume_json}`, `{target_json}`, `{json_only}`.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and career coach. Your task is to enhance the following resume to make it more effective for the target job.

RESUME DATA:
{resume_json}

TARGET JOB:
{target_json}

Please analyze the resume and the target job, then:
1. Enhance the resume content to better align with the target job
2. Improve the wording and impact of bullet points
3. Highlight relevant skills and experiences
4. Provide specific feedback on how to improve the resume further
5. Score the resume's match with the target job on a scale of 0-100

{json_only}

The JSON must have the following structure:
{
  "enhancedResume": { ...same structure as RESUME DATA... },
  "feedback": "Detailed feedback with specific suggestions for improvement",
  "score": 75
}"#;

/// Stricter second attempt. Replace `{resume_json}`, `{target_json}`.
pub const ENHANCE_RETRY_PROMPT_TEMPLATE: &str = r#"Convert the following resume data to an enhanced version for the target job.

RESUME DATA:
{resume_json}

TARGET JOB:
{target_json}

RESPOND ONLY WITH A VALID JSON OBJECT IN THIS EXACT FORMAT:
{
  "enhancedResume": {resume_json},
  "feedback": "Brief feedback here",
  "score": 70
}

DO NOT include any text before or after the JSON. ONLY return the JSON object."#;

pub const SCORE_SYSTEM: &str = "You are an expert resume reviewer and ATS specialist who provides \
    accurate scoring and actionable feedback. You ALWAYS respond with valid JSON only.";

/// Replace `{resume_json}`, `{target_json}`, `{json_only}`.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"You are an expert resume reviewer and ATS (Applicant Tracking System) specialist. Your task is to score the following resume for the target job and provide detailed feedback.

RESUME DATA:
{resume_json}

TARGET JOB:
{target_json}

Please analyze the resume and the target job, then:
1. Score the resume's match with the target job on a scale of 0-100
2. Provide detailed feedback on the resume's strengths and weaknesses
3. Suggest specific improvements to increase the score

{json_only}

The JSON must have the following structure:
{
  "score": 75,
  "feedback": "Detailed feedback with specific suggestions for improvement"
}"#;

pub const ANALYSIS_SYSTEM: &str =
    "You are an expert resume analyzer providing detailed, actionable feedback.";

/// Replace `{resume_json}`, `{json_only}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and rate its overall quality and ATS readiness.

RESUME DATA:
{resume_json}

Identify what the resume does well, what it should improve, the keywords it already covers,
and concrete recommendations. Mention the section each recommendation applies to
(contact details, summary, experience, education, skills or projects).

{json_only}

The JSON must have the following structure:
{
  "score": 75,
  "strengths": ["..."],
  "improvements": ["..."],
  "keywords": ["..."],
  "recommendations": ["..."]
}"#;

pub const MATCH_SYSTEM: &str =
    "You are an expert job matcher providing detailed compatibility analysis.";

/// Replace `{resume_json}`, `{job_json}`, `{json_only}`.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Compare the following resume against the job description.

RESUME DATA:
{resume_json}

JOB DESCRIPTION:
{job_json}

Score the match from 0-100, list the skills the candidate already has that the job asks for,
the skills that are missing, how well the experience aligns, and specific modifications
that would raise the match.

{json_only}

The JSON must have the following structure:
{
  "matchScore": 80,
  "matchingSkills": ["..."],
  "missingSkills": ["..."],
  "experienceAlignment": "...",
  "suggestedModifications": ["..."]
}"#;

pub const COVER_LETTER_SYSTEM: &str =
    "You are an expert cover letter writer creating compelling, personalized letters.";

/// Replace `{resume_json}`, `{job_json}`, `{company_info}`, `{json_only}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for the candidate below applying to the job described.

RESUME DATA:
{resume_json}

JOB DESCRIPTION:
{job_json}

ADDITIONAL COMPANY INFORMATION:
{company_info}

Keep it to four short paragraphs, ground every claim in the resume, and speak to the
company's culture or news where the information above allows.

{json_only}

The JSON must have the following structure:
{
  "coverLetter": "Full letter text with paragraphs separated by blank lines",
  "highlights": ["Resume points the letter emphasises"],
  "keywords": ["Job keywords the letter uses"]
}"#;
