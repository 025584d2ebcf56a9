//! Plain-text resume export for applicant tracking systems.
//!
//! ATS parsers choke on columns, tables and icons, so the export is a flat list
//! of lines: upper-cased name, contact details, then fixed section headings.

use crate::models::resume::ResumeData;

/// Renders `resume` as ATS-friendly plain text. Empty fields and placeholder
/// entries never produce lines.
pub fn render_ats_text(resume: &ResumeData) -> String {
    let mut lines: Vec<String> = Vec::new();
    let info = &resume.personal_info;

    lines.push(info.name.to_uppercase());
    lines.extend(
        [&info.email, &info.phone, &info.location, &info.linkedin, &info.website]
            .into_iter()
            .cloned(),
    );
    lines.push(String::new());

    if !resume.summary.trim().is_empty() {
        lines.push("PROFESSIONAL SUMMARY".to_string());
        lines.push(resume.summary.clone());
        lines.push(String::new());
    }

    lines.push("PROFESSIONAL EXPERIENCE".to_string());
    for exp in resume.experience.iter().filter(|e| !e.title.is_empty() || !e.company.is_empty()) {
        lines.push(exp.title.clone());
        lines.push(join_present(&[&exp.company, &exp.location], " | "));
        lines.push(join_present(&[&exp.start_date, &exp.end_date], " - "));
        lines.push(exp.description.clone());
        lines.extend(exp.achievements.iter().cloned());
        lines.push(String::new());
    }

    lines.push("EDUCATION".to_string());
    for edu in resume
        .education
        .iter()
        .filter(|e| !e.degree.is_empty() || !e.institution.is_empty())
    {
        lines.push(edu.degree.clone());
        lines.push(join_present(&[&edu.institution, &edu.location], " | "));
        let mut graduated = String::new();
        if !edu.graduation_date.is_empty() {
            graduated = format!("Graduated: {}", edu.graduation_date);
        }
        if !edu.gpa.is_empty() {
            graduated = join_present(&[&graduated, &format!("GPA: {}", edu.gpa)], " | ");
        }
        lines.push(graduated);
        lines.extend(edu.achievements.iter().cloned());
        lines.push(String::new());
    }

    lines.push("TECHNICAL SKILLS".to_string());
    lines.push(resume.filled_skills().collect::<Vec<_>>().join(", "));
    lines.push(String::new());

    if resume.projects.iter().any(|p| !p.name.is_empty()) {
        lines.push("PROJECTS".to_string());
        for project in resume.projects.iter().filter(|p| !p.name.is_empty()) {
            lines.push(project.name.clone());
            lines.push(project.description.clone());
            let technologies: Vec<&str> = project
                .technologies
                .iter()
                .map(String::as_str)
                .filter(|t| !t.trim().is_empty())
                .collect();
            if !technologies.is_empty() {
                lines.push(format!("Technologies: {}", technologies.join(", ")));
            }
            if !project.link.is_empty() {
                lines.push(format!("Link: {}", project.link));
            }
            lines.push(String::new());
        }
    }

    // Blank separators give the section breaks; empty content lines are dropped.
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in &lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push("");
            }
        } else {
            out.push(trimmed);
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn join_present(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Download name for the export, e.g. `Jane_Doe_ATS_Resume.txt`.
pub fn ats_file_name(resume: &ResumeData) -> String {
    let stem = resume.file_stem();
    if stem.is_empty() {
        "ATS_Resume.txt".to_string()
    } else {
        format!("{stem}_ATS_Resume.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience, Project};

    fn full_resume() -> ResumeData {
        let mut resume = ResumeData::default();
        resume.personal_info.name = "Jane Doe".to_string();
        resume.personal_info.email = "jane@example.com".to_string();
        resume.personal_info.phone = "555-123-4567".to_string();
        resume.summary = "Backend engineer with 8 years of Rust.".to_string();
        resume.experience = vec![Experience {
            title: "Staff Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            start_date: "2019".to_string(),
            end_date: "Present".to_string(),
            description: "Owned the payments platform.".to_string(),
            achievements: vec!["Cut p99 latency by 40%".to_string(), String::new()],
        }];
        resume.education = vec![Education {
            degree: "BSc Computer Science".to_string(),
            institution: "State University".to_string(),
            location: "Springfield".to_string(),
            graduation_date: "2014".to_string(),
            gpa: "3.8".to_string(),
            achievements: vec![String::new()],
        }];
        resume.skills = vec!["Rust".to_string(), String::new(), "PostgreSQL".to_string()];
        resume.projects = vec![
            Project {
                name: "tinykv".to_string(),
                description: "Embedded key-value store".to_string(),
                technologies: vec!["Rust".to_string(), String::new()],
                link: "https://github.com/jane/tinykv".to_string(),
            },
            Project::default(),
        ];
        resume
    }

    #[test]
    fn test_renders_all_sections_in_order() {
        let text = render_ats_text(&full_resume());
        let order = [
            "JANE DOE",
            "PROFESSIONAL SUMMARY",
            "PROFESSIONAL EXPERIENCE",
            "EDUCATION",
            "TECHNICAL SKILLS",
            "PROJECTS",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|h| text.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_renders_entry_lines() {
        let text = render_ats_text(&full_resume());
        assert!(text.contains("Acme | Remote"));
        assert!(text.contains("2019 - Present"));
        assert!(text.contains("Graduated: 2014 | GPA: 3.8"));
        assert!(text.contains("Rust, PostgreSQL"));
        assert!(text.contains("Technologies: Rust"));
        assert!(text.contains("Link: https://github.com/jane/tinykv"));
    }

    #[test]
    fn test_no_blank_runs_or_trailing_blank() {
        let text = render_ats_text(&full_resume());
        assert!(!text.contains("\n\n\n"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_default_resume_omits_optional_sections() {
        let text = render_ats_text(&ResumeData::default());
        assert!(!text.contains("PROFESSIONAL SUMMARY"));
        assert!(!text.contains("PROJECTS"));
        assert!(!text.contains("Graduated"));
        assert!(!text.contains(" | "));
    }

    #[test]
    fn test_gpa_without_date() {
        let mut resume = ResumeData::default();
        resume.education[0].degree = "MSc".to_string();
        resume.education[0].gpa = "4.0".to_string();
        let text = render_ats_text(&resume);
        assert!(text.contains("GPA: 4.0"));
        assert!(!text.contains("Graduated"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ats_file_name(&full_resume()), "Jane_Doe_ATS_Resume.txt");
        assert_eq!(ats_file_name(&ResumeData::default()), "ATS_Resume.txt");
    }
}
