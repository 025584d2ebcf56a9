pub const JOB_SEARCH_SYSTEM: &str = "You are an AI job search assistant that generates realistic \
    job listings based on search parameters and resume data. You ALWAYS respond with valid JSON only.";

/// Replace `{params_json}`, `{resume_json}`, `{today}`, `{count}`.
pub const JOB_SEARCH_PROMPT_TEMPLATE: &str = r#"You are an AI job search assistant. Your task is to generate realistic job listings based on the search parameters and resume data provided.

SEARCH PARAMETERS:
{params_json}

RESUME DATA:
{resume_json}

Today's date is {today}.

Please generate {count} realistic job listings that match the search parameters. If resume data is provided, the jobs should match the candidate's skills and experience.

Each job listing should include:
- "id": a unique ID
- "title": job title
- "company": company name
- "location": location (indicate if remote)
- "description": 2-3 sentences
- "url": a real job board URL (linkedin.com/jobs/, indeed.com/jobs/, glassdoor.com/job-listing/, etc.)
- "postedDate": posted date within the last 30 days
- "salary": salary range (optional)
- "skills": 5-7 relevant required skills
- "matchScore": how well the job matches the resume, between 60 and 95
- "source": "linkedin", "indeed", or "other"

IMPORTANT: You MUST respond with ONLY a valid JSON array of job listings and nothing else. No explanations, no markdown, no text before or after the JSON."#;
