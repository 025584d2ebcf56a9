//! Best-effort JSON recovery from free-form model text.
//!
//! Models asked for "JSON only" still wrap replies in code fences, prepend
//! `<think>` reasoning, or add a sentence of chatter. `recover_json` walks a
//! fixed ladder of increasingly lenient parses and reports which rung worked.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-block regex"));

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid object regex"));

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\s\S]*\]").expect("valid array regex"));

/// Top-level JSON shape a caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

/// Which rung of the ladder produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rung {
    Direct,
    Cleaned,
    Extracted,
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("no JSON {shape:?} found in model output")]
    NotFound { shape: JsonShape },

    #[error("JSON found but did not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Strips ```json ... ``` or ``` ... ``` code fences.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Removes `<think>…</think>` blocks emitted by reasoning models.
/// An unterminated block swallows the rest of the text.
pub fn strip_reasoning(text: &str) -> Cow<'_, str> {
    let cleaned = THINK_BLOCK.replace_all(text, "");
    match cleaned.find("<think>") {
        Some(idx) => Cow::Owned(cleaned[..idx].to_string()),
        None => cleaned,
    }
}

/// Greedy match from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Greedy match from the first `[` to the last `]`.
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY.find(text).map(|m| m.as_str())
}

fn shape_matches(value: &serde_json::Value, shape: JsonShape) -> bool {
    match shape {
        JsonShape::Object => value.is_object(),
        JsonShape::Array => value.is_array(),
    }
}

/// Parses `candidate` as JSON of the expected shape, then into `T`.
/// `Ok(None)` means "not JSON of that shape"; `Err` means the shape was right
/// but the fields were not.
fn try_parse<T: DeserializeOwned>(
    candidate: &str,
    shape: JsonShape,
) -> Result<Option<T>, serde_json::Error> {
    let value: serde_json::Value = match serde_json::from_str(candidate) {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };
    if !shape_matches(&value, shape) {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

/// Runs the parse ladder: direct → fences/reasoning stripped → regex-extracted.
pub fn recover_json<T: DeserializeOwned>(text: &str, shape: JsonShape) -> Result<T, RecoveryError> {
    recover_json_with_rung(text, shape).map(|(value, _)| value)
}

pub fn recover_json_with_rung<T: DeserializeOwned>(
    text: &str,
    shape: JsonShape,
) -> Result<(T, Rung), RecoveryError> {
    let mut schema_error = None;

    match try_parse(text.trim(), shape) {
        Ok(Some(v)) => return Ok((v, Rung::Direct)),
        Ok(None) => debug!("direct parse of model output failed"),
        Err(e) => schema_error = Some(e),
    }

    let reasoning_free = strip_reasoning(text);
    let cleaned = strip_json_fences(&reasoning_free);
    match try_parse(cleaned, shape) {
        Ok(Some(v)) => return Ok((v, Rung::Cleaned)),
        Ok(None) => debug!("parse after stripping fences/reasoning failed"),
        Err(e) => schema_error = Some(e),
    }

    let extracted = match shape {
        JsonShape::Object => extract_json_object(cleaned),
        JsonShape::Array => extract_json_array(cleaned),
    };
    if let Some(candidate) = extracted {
        match try_parse(candidate, shape) {
            Ok(Some(v)) => return Ok((v, Rung::Extracted)),
            Ok(None) => warn!("extracted JSON {shape:?} substring did not parse"),
            Err(e) => schema_error = Some(e),
        }
    }

    Err(match schema_error {
        Some(e) => RecoveryError::Schema(e),
        None => RecoveryError::NotFound { shape },
    })
}
