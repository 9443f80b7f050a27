use crate::models::{GeneratedImage, GenerationResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

/// Extracts image bytes from a list of raw prediction objects.
///
/// The predict endpoint has returned at least two shapes across model
/// versions: base64 bytes at the top level, or nested under an `image`
/// wrapper. Each entry is tried in that order; an entry that matches
/// neither shape (or carries invalid base64) becomes a per-entry failure
/// marker rather than an error, so one malformed prediction never hides
/// the rest. An empty input yields an empty result.
pub fn normalize(predictions: &[Value]) -> GenerationResult {
    predictions.iter().map(extract_entry).collect()
}

fn extract_entry(prediction: &Value) -> GeneratedImage {
    let encoded = prediction["bytesBase64Encoded"]
        .as_str()
        .or_else(|| prediction["image"]["bytesBase64Encoded"].as_str());

    let encoded = match encoded {
        Some(s) => s,
        None => {
            log::warn!("Prediction carries no image payload: {}", shape_of(prediction));
            return GeneratedImage::Failed(format!(
                "no base64 image payload in prediction ({})",
                shape_of(prediction)
            ));
        }
    };

    match STANDARD.decode(encoded) {
        Ok(bytes) => GeneratedImage::Image(bytes),
        Err(e) => GeneratedImage::Failed(format!("invalid base64 image payload: {}", e)),
    }
}

/// Short description of a prediction's top-level keys, for diagnostics.
fn shape_of(prediction: &Value) -> String {
    match prediction.as_object() {
        Some(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        None => format!("non-object value of type {}", json_type(prediction)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
