use crate::{
    error::{GenAiError, Result},
    models::{
        catalog, GenerationOptions, GenerationRequest, GenerationResult, ModelCategory,
        ModelInfo, ReferenceImage, ReferenceKind,
    },
    normalize,
    vertex::traits::PredictionService,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;

/// Imagen client covering prompt-only generation and reference-conditioned
/// editing. Both go to the model's predict endpoint; editing additionally
/// carries reference images and an edit mode.
#[derive(Clone)]
pub struct ImageClient {
    service: Arc<dyn PredictionService>,
    generate_model: String,
    edit_model: String,
}

impl ImageClient {
    pub fn new(
        service: Arc<dyn PredictionService>,
        generate_model: String,
        edit_model: String,
    ) -> Self {
        Self {
            service,
            generate_model,
            edit_model,
        }
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        catalog()
            .into_iter()
            .filter(|m| {
                m.category == ModelCategory::Generate || m.category == ModelCategory::Edit
            })
            .collect()
    }

    pub fn generate_model(&self) -> &str {
        &self.generate_model
    }

    pub fn edit_model(&self) -> &str {
        &self.edit_model
    }

    /// Text-to-image generation. The request's references, if any, are sent
    /// too, so a caller may use one assembled request for either path.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        self.invoke(request).await
    }

    /// Reference-conditioned editing (background swap, subject transpose,
    /// inpainting). Requires at least one reference image.
    pub async fn edit(&self, request: GenerationRequest) -> Result<GenerationResult> {
        if request.references().is_empty() {
            return Err(GenAiError::RequestError(
                "edit requires at least one reference image".into(),
            ));
        }
        self.invoke(request).await
    }

    async fn invoke(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let model_id = request.model_id().to_string();
        let instance = build_instance(&request);
        let parameters = build_parameters(request.options());

        log::info!(
            "Generating {} image(s) with model: {}",
            request.options().image_count,
            model_id
        );

        let predictions = self
            .service
            .predict(&model_id, vec![instance], parameters)
            .await?;

        let result = normalize::normalize(&predictions);
        if result.failed() > 0 {
            log::warn!(
                "{} of {} prediction(s) carried no decodable image",
                result.failed(),
                result.len()
            );
        }
        Ok(result)
    }
}

/// Builds the single instance object of a predict call.
pub fn build_instance(request: &GenerationRequest) -> Value {
    let mut instance = json!({ "prompt": request.prompt() });

    if !request.references().is_empty() {
        let references: Vec<Value> = request
            .references()
            .iter()
            .map(build_reference)
            .collect();
        instance["referenceImages"] = Value::Array(references);
    }

    instance
}

fn build_reference(reference: &ReferenceImage) -> Value {
    let mut entry = json!({
        "referenceType": reference.kind.reference_type(),
        "referenceId": reference.reference_id,
    });

    if let Some(bytes) = &reference.image {
        entry["referenceImage"] = json!({ "bytesBase64Encoded": STANDARD.encode(bytes) });
    }

    match &reference.kind {
        ReferenceKind::Raw => {}
        ReferenceKind::Subject {
            description,
            subject_type,
        } => {
            entry["subjectImageConfig"] = json!({
                "subjectDescription": description,
                "subjectType": subject_type.as_str(),
            });
        }
        ReferenceKind::Mask { mask_mode, dilation } => {
            let mut config = json!({ "maskMode": mask_mode.as_str() });
            if let Some(dilation) = dilation {
                config["dilation"] = json!(dilation);
            }
            entry["maskImageConfig"] = config;
        }
        ReferenceKind::Control { control_type } => {
            entry["controlImageConfig"] = json!({ "controlType": control_type.as_str() });
        }
    }

    entry
}

/// Builds the parameters object of a predict call.
pub fn build_parameters(options: &GenerationOptions) -> Value {
    let mut parameters = json!({
        "sampleCount": options.image_count,
        "safetySetting": options.safety_level.as_str(),
        "personGeneration": options.person_generation.as_str(),
        "addWatermark": options.add_watermark,
    });

    if let Some(ratio) = options.aspect_ratio {
        parameters["aspectRatio"] = json!(ratio.as_str());
    }
    if let Some(seed) = options.seed {
        parameters["seed"] = json!(seed);
    }
    if let Some(mode) = options.edit_mode {
        parameters["editMode"] = json!(mode.as_str());
    }

    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenAiError;
    use crate::models::{
        AspectRatio, EditMode, GeneratedImage, MaskMode, ReferenceSetBuilder,
        SafetyFilterLevel, SubjectType,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned predictions and records what was sent.
    struct StubService {
        predictions: Vec<Value>,
        seen: Mutex<Vec<(String, Vec<Value>, Value)>>,
    }

    impl StubService {
        fn new(predictions: Vec<Value>) -> Self {
            Self {
                predictions,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PredictionService for StubService {
        async fn predict(
            &self,
            model_id: &str,
            instances: Vec<Value>,
            parameters: Value,
        ) -> Result<Vec<Value>> {
            self.seen
                .lock()
                .unwrap()
                .push((model_id.to_string(), instances, parameters));
            Ok(self.predictions.clone())
        }
    }

    fn bgswap_request() -> GenerationRequest {
        let references = ReferenceSetBuilder::new()
            .raw_with_id(0, vec![1, 2, 3])
            .mask_by_mode_with_id(1, MaskMode::Background)
            .build()
            .unwrap();
        GenerationRequest::assemble(
            "imagen-3.0-capability-001",
            "A sunlit forest clearing",
            references,
            GenerationOptions::new()
                .with_image_count(4)
                .with_seed(42)
                .with_edit_mode(EditMode::BackgroundSwap),
        )
        .unwrap()
    }

    #[test]
    fn instance_carries_prompt_and_references() {
        let instance = build_instance(&bgswap_request());
        assert_eq!(instance["prompt"], "A sunlit forest clearing");

        let references = instance["referenceImages"].as_array().unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0]["referenceType"], "REFERENCE_TYPE_RAW");
        assert_eq!(references[0]["referenceId"], 0);
        assert_eq!(
            references[0]["referenceImage"]["bytesBase64Encoded"],
            STANDARD.encode([1u8, 2, 3])
        );
        assert_eq!(references[1]["referenceType"], "REFERENCE_TYPE_MASK");
        assert_eq!(
            references[1]["maskImageConfig"]["maskMode"],
            "MASK_MODE_BACKGROUND"
        );
        assert!(references[1].get("referenceImage").is_none());
    }

    #[test]
    fn subject_reference_serializes_its_config() {
        let references = ReferenceSetBuilder::new()
            .subject_with_id(1, vec![9], "a shoe", SubjectType::Product)
            .build()
            .unwrap();
        let request = GenerationRequest::assemble(
            "imagen-3.0-capability-001",
            "A shoe [1] on a beach",
            references,
            GenerationOptions::new(),
        )
        .unwrap();

        let instance = build_instance(&request);
        let subject = &instance["referenceImages"][0];
        assert_eq!(subject["subjectImageConfig"]["subjectDescription"], "a shoe");
        assert_eq!(
            subject["subjectImageConfig"]["subjectType"],
            "SUBJECT_TYPE_PRODUCT"
        );
    }

    #[test]
    fn prompt_only_instance_has_no_reference_field() {
        let request = GenerationRequest::assemble(
            "imagen-4.0-generate-preview-06-06",
            "A moodboard",
            Vec::new(),
            GenerationOptions::new(),
        )
        .unwrap();
        let instance = build_instance(&request);
        assert!(instance.get("referenceImages").is_none());
    }

    #[test]
    fn parameters_reflect_options() {
        let options = GenerationOptions::new()
            .with_image_count(4)
            .with_aspect_ratio(AspectRatio::Widescreen)
            .with_safety_level(SafetyFilterLevel::BlockOnlyHigh)
            .with_watermark(false)
            .with_seed(7);
        let parameters = build_parameters(&options);

        assert_eq!(parameters["sampleCount"], 4);
        assert_eq!(parameters["aspectRatio"], "16:9");
        assert_eq!(parameters["safetySetting"], "block_only_high");
        assert_eq!(parameters["personGeneration"], "allow_adult");
        assert_eq!(parameters["addWatermark"], false);
        assert_eq!(parameters["seed"], 7);
        assert!(parameters.get("editMode").is_none());
    }

    #[tokio::test]
    async fn edit_posts_one_instance_to_the_edit_model() {
        let encoded = STANDARD.encode(b"result");
        let stub = Arc::new(StubService::new(vec![
            json!({ "bytesBase64Encoded": encoded }),
        ]));
        let client = ImageClient::new(
            stub.clone(),
            "generate-model".into(),
            "edit-model".into(),
        );

        let result = client.edit(bgswap_request()).await.unwrap();
        assert_eq!(result.succeeded(), 1);
        assert_eq!(
            result.images()[0],
            GeneratedImage::Image(b"result".to_vec())
        );

        let seen = stub.seen.lock().unwrap();
        let (model, instances, parameters) = &seen[0];
        assert_eq!(model, "imagen-3.0-capability-001");
        assert_eq!(instances.len(), 1);
        assert_eq!(parameters["editMode"], "EDIT_MODE_BGSWAP");
    }

    #[tokio::test]
    async fn edit_without_references_is_rejected() {
        let stub = Arc::new(StubService::new(Vec::new()));
        let client = ImageClient::new(stub, "g".into(), "e".into());
        let request = GenerationRequest::assemble(
            "e",
            "A beach",
            Vec::new(),
            GenerationOptions::new(),
        )
        .unwrap();

        let err = client.edit(request).await.unwrap_err();
        assert!(matches!(err, GenAiError::RequestError(_)));
    }

    #[tokio::test]
    async fn empty_predictions_become_an_empty_result() {
        let stub = Arc::new(StubService::new(Vec::new()));
        let client = ImageClient::new(stub, "g".into(), "e".into());
        let request = GenerationRequest::assemble(
            "g",
            "A beach",
            Vec::new(),
            GenerationOptions::new(),
        )
        .unwrap();

        let result = client.generate(request).await.unwrap();
        assert!(result.is_empty());
    }
}
