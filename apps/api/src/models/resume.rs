use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
            achievements: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub graduation_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gpa: String,
    #[serde(deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            degree: String::new(),
            institution: String::new(),
            location: String::new(),
            graduation_date: String::new(),
            gpa: String::new(),
            achievements: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            technologies: vec![String::new()],
            link: String::new(),
        }
    }
}

/// The full resume document as edited in the builder.
///
/// Every list holds at least one entry: an empty placeholder stands in for
/// "nothing entered yet" so the form always has a row to fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

impl Default for ResumeData {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            experience: vec![Experience::default()],
            education: vec![Education::default()],
            skills: vec![String::new()],
            projects: vec![Project::default()],
        }
    }
}

impl ResumeData {
    /// Restores the single-placeholder shape on any list the model left empty.
    pub fn normalize(mut self) -> Self {
        if self.experience.is_empty() {
            self.experience.push(Experience::default());
        }
        for exp in &mut self.experience {
            fill_placeholder(&mut exp.achievements);
        }

        if self.education.is_empty() {
            self.education.push(Education::default());
        }
        for edu in &mut self.education {
            fill_placeholder(&mut edu.achievements);
        }

        fill_placeholder(&mut self.skills);

        if self.projects.is_empty() {
            self.projects.push(Project::default());
        }
        for project in &mut self.projects {
            fill_placeholder(&mut project.technologies);
        }

        self
    }

    /// Skills with the empty placeholders removed.
    pub fn filled_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Candidate name with whitespace runs collapsed to underscores, for download names.
    pub fn file_stem(&self) -> String {
        self.personal_info
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }
}

fn fill_placeholder(list: &mut Vec<String>) {
    if list.is_empty() {
        list.push(String::new());
    }
}

/// The role a resume is being tailored for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobTarget {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
}

/// A job description supplied for matching and cover letters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobDescription {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeEnhancementResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enhanced_resume: ResumeData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub improvements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub match_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub matching_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_alignment: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suggested_modifications: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetter {
    #[serde(deserialize_with = "null_as_default")]
    pub cover_letter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

/// Clamps a model-reported score into `0..=100`. NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0).round()
    }
}
