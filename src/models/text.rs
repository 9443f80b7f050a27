/// A prompt-refinement call: the user's rough scene idea, optionally with
/// the primary subject image for visual grounding.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinePromptRequest {
    pub scene_idea: String,
    pub subject_image: Option<Vec<u8>>,
    pub subject_mime_type: Option<String>,
    pub model_id: Option<String>,
}

impl RefinePromptRequest {
    pub fn new(scene_idea: impl Into<String>) -> Self {
        Self {
            scene_idea: scene_idea.into(),
            subject_image: None,
            subject_mime_type: None,
            model_id: None,
        }
    }

    pub fn with_subject_image(mut self, image: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.subject_image = Some(image);
        self.subject_mime_type = Some(mime_type.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}
