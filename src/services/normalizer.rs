// src/services/normalizer.rs
use log::warn;
use serde_json::{Value, json};

const FALLBACK_TITLE: &str = "Article de mode";
const FALLBACK_CATEGORY: &str = "Mode";

/// Turns the raw model completion into a listing draft. This never fails:
/// the model is instructed to answer with bare JSON but sometimes wraps it
/// in markdown fences or ignores the instruction altogether. A completion
/// that still does not parse after fence-stripping becomes a degraded draft
/// that keeps the full text in `description`.
pub fn normalize_completion(completion: &str, category_hint: Option<&str>) -> Value {
    match serde_json::from_str::<Value>(strip_code_fences(completion)) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(
                "Model completion is not valid JSON ({}), using fallback draft. Raw completion: {}",
                err, completion
            );
            json!({
                "titre": FALLBACK_TITLE,
                "description": completion,
                "categorie": category_hint.unwrap_or(FALLBACK_CATEGORY),
                "prix_suggere": { "minimum": 5, "optimal": 15, "maximum": 30 }
            })
        }
    }
}

/// Strips a leading ```json or ``` marker and a trailing ``` marker.
fn strip_code_fences(completion: &str) -> &str {
    let mut text = completion.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
