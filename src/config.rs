use std::env;

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_GENERATE_MODEL: &str = "imagen-4.0-generate-preview-06-06";
pub const DEFAULT_EDIT_MODEL: &str = "imagen-3.0-capability-001";
pub const DEFAULT_TRYON_MODEL: &str = "virtual-try-on-exp-05-31";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project: Option<String>,
    pub location: Option<String>,
    pub access_token: Option<String>,
    pub generate_model: Option<String>,
    pub edit_model: Option<String>,
    pub tryon_model: Option<String>,
    pub text_model: Option<String>,
}

impl Default for VertexConfig {
    fn default() -> Self {
        VertexConfig {
            project: None,
            location: None,
            access_token: None,
            generate_model: None,
            edit_model: None,
            tryon_model: None,
            text_model: None,
        }
    }
}

impl VertexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let project = env::var("GOOGLE_CLOUD_PROJECT").ok();
        let location = env::var("GOOGLE_CLOUD_REGION").ok();
        let access_token = env::var("GOOGLE_ACCESS_TOKEN").ok();
        let generate_model = env::var("IMAGEN_GENERATE_MODEL").ok();
        let edit_model = env::var("IMAGEN_EDIT_MODEL").ok();
        let tryon_model = env::var("IMAGEN_TRYON_MODEL").ok();
        let text_model = env::var("GEMINI_TEXT_MODEL").ok();

        VertexConfig {
            project,
            location,
            access_token,
            generate_model,
            edit_model,
            tryon_model,
            text_model,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_generate_model(mut self, model_id: impl Into<String>) -> Self {
        self.generate_model = Some(model_id.into());
        self
    }

    pub fn with_edit_model(mut self, model_id: impl Into<String>) -> Self {
        self.edit_model = Some(model_id.into());
        self
    }

    pub fn with_tryon_model(mut self, model_id: impl Into<String>) -> Self {
        self.tryon_model = Some(model_id.into());
        self
    }

    pub fn with_text_model(mut self, model_id: impl Into<String>) -> Self {
        self.text_model = Some(model_id.into());
        self
    }

    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION)
    }

    pub fn generate_model_or_default(&self) -> &str {
        self.generate_model
            .as_deref()
            .unwrap_or(DEFAULT_GENERATE_MODEL)
    }

    pub fn edit_model_or_default(&self) -> &str {
        self.edit_model.as_deref().unwrap_or(DEFAULT_EDIT_MODEL)
    }

    pub fn tryon_model_or_default(&self) -> &str {
        self.tryon_model.as_deref().unwrap_or(DEFAULT_TRYON_MODEL)
    }

    pub fn text_model_or_default(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = VertexConfig::new()
            .with_project("demo-project")
            .with_location("europe-west4")
            .with_access_token("ya29.token");

        assert_eq!(config.project.as_deref(), Some("demo-project"));
        assert_eq!(config.location_or_default(), "europe-west4");
        assert_eq!(config.access_token.as_deref(), Some("ya29.token"));
    }

    #[test]
    fn defaults_cover_all_models() {
        let config = VertexConfig::new();
        assert_eq!(config.location_or_default(), DEFAULT_LOCATION);
        assert_eq!(config.generate_model_or_default(), DEFAULT_GENERATE_MODEL);
        assert_eq!(config.edit_model_or_default(), DEFAULT_EDIT_MODEL);
        assert_eq!(config.tryon_model_or_default(), DEFAULT_TRYON_MODEL);
        assert_eq!(config.text_model_or_default(), DEFAULT_TEXT_MODEL);
    }
}
