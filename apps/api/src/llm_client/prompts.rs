// Shared prompt fragments. Each feature keeps its own prompts.rs alongside it;
// this file holds the pieces that cut across features.

/// Appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: You MUST respond with ONLY a valid JSON \
    value and nothing else. No explanations, no markdown, no text before or after the JSON.";

/// System prompt for the stricter second attempt when a reply could not be recovered.
pub const JSON_FORMATTER_SYSTEM: &str =
    "You are a JSON formatting assistant. You only respond with valid JSON objects and nothing else.";

pub const PING_SYSTEM: &str = "You are a helpful assistant.";

pub const PING_PROMPT: &str = "Please respond with 'API is working!' if you receive this message.";

/// Fills `{name}` placeholders in a template. Unknown placeholders are left untouched.
///
/// Single pass over the template: inserted values are never rescanned, so resume
/// text containing `{json_only}` stays literal.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x then y");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{missing}", &[("a", "x")]), "{missing}");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let out = render(
            "RESUME: {resume_json}\nTARGET: {target_json}",
            &[("resume_json", "I wrote {target_json} once"), ("target_json", "Rust")],
        );
        assert_eq!(out, "RESUME: I wrote {target_json} once\nTARGET: Rust");
    }

    #[test]
    fn test_render_keeps_literal_braces() {
        let out = render(r#"Return {"score": {n}}"#, &[("n", "80")]);
        assert_eq!(out, r#"Return {"score": 80}"#);
    }
}
