pub mod image_client;
pub mod text_client;
pub mod traits;
pub mod tryon_client;

use crate::{
    config::VertexConfig,
    error::{GenAiError, Result},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use traits::{ContentService, PredictionService};
pub use tryon_client::{TryOnClient, TryOnRequest};

/// Grouped Vertex AI clients sharing one prediction service.
#[derive(Clone)]
pub struct VertexClient {
    image_client: ImageClient,
    tryon_client: TryOnClient,
    text_client: TextClient,
}

impl VertexClient {
    pub fn new(config: VertexConfig) -> Result<Self> {
        let service = Arc::new(HttpPredictionService::new(&config)?);
        Ok(Self::with_services(service.clone(), service, &config))
    }

    /// Builds the client over caller-supplied service implementations.
    pub fn with_services(
        predictions: Arc<dyn PredictionService>,
        content: Arc<dyn ContentService>,
        config: &VertexConfig,
    ) -> Self {
        Self {
            image_client: ImageClient::new(
                predictions.clone(),
                config.generate_model_or_default().to_string(),
                config.edit_model_or_default().to_string(),
            ),
            tryon_client: TryOnClient::new(
                predictions,
                config.tryon_model_or_default().to_string(),
            ),
            text_client: TextClient::new(content, config.text_model_or_default().to_string()),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn try_on(&self) -> &TryOnClient {
        &self.tryon_client
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }
}

/// Prediction service over the regional Vertex AI REST endpoint.
#[derive(Debug)]
pub struct HttpPredictionService {
    http: reqwest::Client,
    project: String,
    location: String,
    access_token: String,
}

impl HttpPredictionService {
    pub fn new(config: &VertexConfig) -> Result<Self> {
        let project = config
            .project
            .clone()
            .ok_or_else(|| GenAiError::ConfigError("project is required".into()))?;
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| GenAiError::ConfigError("access token is required".into()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            project,
            location: config.location_or_default().to_string(),
            access_token,
        })
    }

    fn endpoint(&self, model_id: &str, verb: &str) -> String {
        format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:{verb}",
            location = self.location,
            project = self.project,
            model = model_id,
            verb = verb,
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| GenAiError::HttpError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenAiError::HttpError(e.to_string()))?;

        if !status.is_success() {
            // Provider failures pass through unchanged; the caller presents them.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(text);
            log::error!("Vertex AI returned {}: {}", status, message);
            return Err(GenAiError::ProviderError(message));
        }

        serde_json::from_str(&text).map_err(|e| GenAiError::ResponseError(e.to_string()))
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        model_id: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> Result<Vec<Value>> {
        let url = self.endpoint(model_id, "predict");
        let body = json!({
            "instances": instances,
            "parameters": parameters,
        });

        let parsed = self.post(&url, &body).await?;
        match parsed["predictions"].as_array() {
            Some(predictions) => Ok(predictions.clone()),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentService for HttpPredictionService {
    async fn generate_content(&self, model_id: &str, body: Value) -> Result<Value> {
        let url = self.endpoint(model_id, "generateContent");
        self.post(&url, &body).await
    }
}
