// Resume features: parsing, enhancement, scoring, analysis, cover letters, ATS export.
// All LLM calls go through llm_client; every feature degrades to a canned value on failure.

pub mod analysis;
pub mod ats;
pub mod cover_letter;
pub mod enhance;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod scoring;
pub mod upload;
