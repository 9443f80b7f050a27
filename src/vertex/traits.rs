use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The predict call boundary. The HTTP implementation lives in
/// [`crate::vertex::HttpPredictionService`]; tests substitute their own.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Posts instances and parameters to a model's predict endpoint and
    /// returns the raw prediction objects, shape untouched.
    async fn predict(
        &self,
        model_id: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> Result<Vec<Value>>;
}

/// The generateContent call boundary used by the Gemini text client.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Posts a generateContent body to a model and returns the raw
    /// response object, shape untouched.
    async fn generate_content(&self, model_id: &str, body: Value) -> Result<Value>;
}
