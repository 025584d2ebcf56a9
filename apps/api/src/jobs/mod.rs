// Job search: LLM-synthesized listings with a fixed mock set as fallback.

pub mod handlers;
pub mod prompts;
pub mod search;
