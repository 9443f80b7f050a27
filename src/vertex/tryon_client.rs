use crate::{
    error::{GenAiError, Result},
    models::{
        catalog, GenerationResult, ModelCategory, ModelInfo, PersonGeneration,
        SafetyFilterLevel, MAX_IMAGE_COUNT,
    },
    normalize,
    vertex::traits::PredictionService,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;

/// A virtual try-on call: one person image, one or more product images.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOnRequest {
    pub person_image: Vec<u8>,
    pub product_images: Vec<Vec<u8>>,
    pub sample_count: u32,
    /// Denoising steps; quality versus speed.
    pub base_steps: Option<u32>,
    pub safety_level: SafetyFilterLevel,
    pub person_generation: PersonGeneration,
}

impl TryOnRequest {
    pub fn new(person_image: Vec<u8>, product_image: Vec<u8>) -> Self {
        Self {
            person_image,
            product_images: vec![product_image],
            sample_count: 1,
            base_steps: None,
            safety_level: SafetyFilterLevel::BlockLowAndAbove,
            person_generation: PersonGeneration::AllowAdult,
        }
    }

    pub fn with_product_image(mut self, image: Vec<u8>) -> Self {
        self.product_images.push(image);
        self
    }

    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    pub fn with_base_steps(mut self, steps: u32) -> Self {
        self.base_steps = Some(steps);
        self
    }

    pub fn with_safety_level(mut self, level: SafetyFilterLevel) -> Self {
        self.safety_level = level;
        self
    }

    pub fn with_person_generation(mut self, policy: PersonGeneration) -> Self {
        self.person_generation = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.person_image.is_empty() {
            return Err(GenAiError::RequestError("person image is empty".into()));
        }
        if self.product_images.is_empty() || self.product_images.iter().any(Vec::is_empty) {
            return Err(GenAiError::RequestError(
                "at least one non-empty product image is required".into(),
            ));
        }
        if self.sample_count == 0 || self.sample_count > MAX_IMAGE_COUNT {
            return Err(GenAiError::InvalidOption(format!(
                "sample_count must be between 1 and {}, got {}",
                MAX_IMAGE_COUNT, self.sample_count
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct TryOnClient {
    service: Arc<dyn PredictionService>,
    model_id: String,
}

impl TryOnClient {
    pub fn new(service: Arc<dyn PredictionService>, model_id: String) -> Self {
        Self { service, model_id }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        catalog()
            .into_iter()
            .filter(|m| m.category == ModelCategory::TryOn)
            .collect()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn try_on(&self, request: TryOnRequest) -> Result<GenerationResult> {
        request.validate()?;

        let instance = build_instance(&request);
        let parameters = build_parameters(&request);

        log::info!(
            "Virtual try-on with model {} ({} product image(s))",
            self.model_id,
            request.product_images.len()
        );

        let predictions = self
            .service
            .predict(&self.model_id, vec![instance], parameters)
            .await?;

        Ok(normalize::normalize(&predictions))
    }
}

pub fn build_instance(request: &TryOnRequest) -> Value {
    let product_images: Vec<Value> = request
        .product_images
        .iter()
        .map(|bytes| json!({ "image": { "bytesBase64Encoded": STANDARD.encode(bytes) } }))
        .collect();

    json!({
        "personImage": {
            "image": { "bytesBase64Encoded": STANDARD.encode(&request.person_image) }
        },
        "productImages": product_images,
    })
}

pub fn build_parameters(request: &TryOnRequest) -> Value {
    let mut parameters = json!({
        "sampleCount": request.sample_count,
        "safetySetting": request.safety_level.as_str(),
        "personGeneration": request.person_generation.as_str(),
    });

    if let Some(steps) = request.base_steps {
        parameters["baseSteps"] = json!(steps);
    }

    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubService {
        predictions: Vec<Value>,
    }

    #[async_trait]
    impl PredictionService for StubService {
        async fn predict(
            &self,
            _model_id: &str,
            _instances: Vec<Value>,
            _parameters: Value,
        ) -> Result<Vec<Value>> {
            Ok(self.predictions.clone())
        }
    }

    #[test]
    fn instance_nests_images_under_wrappers() {
        let request = TryOnRequest::new(b"person".to_vec(), b"shirt".to_vec())
            .with_product_image(b"shoes".to_vec());
        let instance = build_instance(&request);

        assert_eq!(
            instance["personImage"]["image"]["bytesBase64Encoded"],
            STANDARD.encode(b"person")
        );
        let products = instance["productImages"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(
            products[1]["image"]["bytesBase64Encoded"],
            STANDARD.encode(b"shoes")
        );
    }

    #[test]
    fn parameters_include_base_steps_when_set() {
        let request = TryOnRequest::new(b"p".to_vec(), b"q".to_vec())
            .with_sample_count(1)
            .with_base_steps(25);
        let parameters = build_parameters(&request);
        assert_eq!(parameters["sampleCount"], 1);
        assert_eq!(parameters["baseSteps"], 25);
        assert_eq!(parameters["safetySetting"], "block_low_and_above");
    }

    #[test]
    fn sample_count_bounds_are_enforced() {
        let request = TryOnRequest::new(b"p".to_vec(), b"q".to_vec()).with_sample_count(5);
        assert!(matches!(
            request.validate().unwrap_err(),
            GenAiError::InvalidOption(_)
        ));
    }

    #[test]
    fn empty_person_image_is_rejected() {
        let request = TryOnRequest::new(Vec::new(), b"q".to_vec());
        assert!(matches!(
            request.validate().unwrap_err(),
            GenAiError::RequestError(_)
        ));
    }

    #[tokio::test]
    async fn try_on_normalizes_predictions() {
        let stub = Arc::new(StubService {
            predictions: vec![
                json!({ "bytesBase64Encoded": STANDARD.encode(b"fit") }),
                json!({ "unexpected": true }),
            ],
        });
        let client = TryOnClient::new(stub, "virtual-try-on-exp-05-31".into());

        let result = client
            .try_on(TryOnRequest::new(b"p".to_vec(), b"q".to_vec()))
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.succeeded(), 1);
        assert_eq!(result.failed(), 1);
    }
}
