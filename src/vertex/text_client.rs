use crate::{
    error::{GenAiError, Result},
    models::{catalog, ModelCategory, ModelInfo, RefinePromptRequest},
    vertex::traits::ContentService,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;

/// System instruction that turns a rough scene idea into a subject-marked
/// Imagen prompt. The refined prompt must refer to the product through the
/// `[1]` placeholder so Imagen can bind it to the subject reference image.
const REFINEMENT_SYSTEM_INSTRUCTION: &str = "\
You are an expert prompting assistant for Imagen subject customization.
Take the user's scene idea (and reference product image, when attached) and
produce one detailed Imagen prompt.

Rules:
- Refer to the product ONLY through the placeholder `[1]`; never replace it
  with a full description. Imagen uses `[1]` to bind the subject reference
  image to the prompt.
- You may add 1-3 descriptive adjectives around `[1]`.
- If the user's idea contains its own placeholder (e.g. '[the watch]'),
  replace it with `[1]`.
- Fully describe the scene around `[1]`: setting, mood, lighting, style.
- Output ONLY the final Imagen prompt, nothing else.
";

/// Gemini client for prompt refinement ahead of a subject-conditioned
/// generation call.
#[derive(Clone)]
pub struct TextClient {
    service: Arc<dyn ContentService>,
    model_id: String,
}

impl TextClient {
    pub fn new(service: Arc<dyn ContentService>, model_id: String) -> Self {
        Self { service, model_id }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        catalog()
            .into_iter()
            .filter(|m| m.category == ModelCategory::Text)
            .collect()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Rewrites the user's scene idea into an Imagen prompt carrying the
    /// `[1]` subject marker. The returned text still goes through
    /// [`crate::models::GenerationRequest::assemble`], which enforces the
    /// marker before any image call.
    pub async fn refine_prompt(&self, request: RefinePromptRequest) -> Result<String> {
        if request.scene_idea.trim().is_empty() {
            return Err(GenAiError::EmptyPrompt);
        }

        let model_id = request
            .model_id
            .clone()
            .unwrap_or_else(|| self.model_id.clone());
        let body = build_content_body(&request);

        log::info!("Refining prompt with model: {}", model_id);

        let response = self.service.generate_content(&model_id, body).await?;
        parse_text(&response)
    }
}

/// Builds the generateContent body: the user's idea as a text part, the
/// subject image as inline data when present, and the refinement system
/// instruction.
pub fn build_content_body(request: &RefinePromptRequest) -> Value {
    let mut parts = vec![json!({
        "text": format!(
            "User's desired scene idea: \"{}\"\n\nGenerate the optimized Imagen prompt using `[1]` for the product, per system instructions.",
            request.scene_idea
        )
    })];

    if let Some(bytes) = &request.subject_image {
        let mime_type = request
            .subject_mime_type
            .as_deref()
            .unwrap_or("image/png");
        parts.push(json!({
            "inlineData": {
                "mimeType": mime_type,
                "data": STANDARD.encode(bytes),
            }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "systemInstruction": {
            "parts": [{ "text": REFINEMENT_SYSTEM_INSTRUCTION }]
        },
    })
}

/// Joins the text parts of the first candidate; an answer with no text is a
/// response error, since the caller has nothing to feed into assembly.
pub fn parse_text(response: &Value) -> Result<String> {
    let parts = match response["candidates"][0]["content"]["parts"].as_array() {
        Some(parts) => parts,
        None => {
            return Err(GenAiError::ResponseError(
                "generateContent response carries no candidate parts".into(),
            ))
        }
    };

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenAiError::ResponseError(
            "generateContent returned an empty prompt".into(),
        ));
    }

    Ok(text.to_string())
}
