use crate::error::{GenAiError, Result};
use crate::models::reference::ReferenceImage;
use serde::{Deserialize, Serialize};

/// Upper bound the Imagen predict endpoint documents for sampleCount.
pub const MAX_IMAGE_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Portrait3x4,
    Landscape4x3,
    Widescreen,
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyFilterLevel {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

impl SafetyFilterLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyFilterLevel::BlockLowAndAbove => "block_low_and_above",
            SafetyFilterLevel::BlockMediumAndAbove => "block_medium_and_above",
            SafetyFilterLevel::BlockOnlyHigh => "block_only_high",
            SafetyFilterLevel::BlockNone => "block_none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonGeneration {
    DontAllow,
    AllowAdult,
    AllowAll,
}

impl PersonGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonGeneration::DontAllow => "dont_allow",
            PersonGeneration::AllowAdult => "allow_adult",
            PersonGeneration::AllowAll => "allow_all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    Default,
    BackgroundSwap,
    InpaintInsertion,
    InpaintRemoval,
    Outpaint,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Default => "EDIT_MODE_DEFAULT",
            EditMode::BackgroundSwap => "EDIT_MODE_BGSWAP",
            EditMode::InpaintInsertion => "EDIT_MODE_INPAINT_INSERTION",
            EditMode::InpaintRemoval => "EDIT_MODE_INPAINT_REMOVAL",
            EditMode::Outpaint => "EDIT_MODE_OUTPAINT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub image_count: u32,
    pub aspect_ratio: Option<AspectRatio>,
    pub safety_level: SafetyFilterLevel,
    pub person_generation: PersonGeneration,
    pub seed: Option<i64>,
    pub add_watermark: bool,
    pub edit_mode: Option<EditMode>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            image_count: 1,
            aspect_ratio: None,
            safety_level: SafetyFilterLevel::BlockMediumAndAbove,
            person_generation: PersonGeneration::AllowAdult,
            seed: None,
            add_watermark: true,
            edit_mode: None,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_count(mut self, count: u32) -> Self {
        self.image_count = count;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
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

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_watermark(mut self, enabled: bool) -> Self {
        self.add_watermark = enabled;
        self
    }

    pub fn with_edit_mode(mut self, mode: EditMode) -> Self {
        self.edit_mode = Some(mode);
        self
    }
}

/// A fully validated generation call, ready for the predict endpoint.
///
/// Construction goes through [`GenerationRequest::assemble`]; the fields are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    model_id: String,
    prompt: String,
    references: Vec<ReferenceImage>,
    options: GenerationOptions,
}

impl GenerationRequest {
    /// Validates and freezes a request.
    ///
    /// Every subject reference id must appear in the prompt as its `[id]`
    /// marker, otherwise the model has no way to bind the subject image to
    /// the text.
    pub fn assemble(
        model_id: impl Into<String>,
        prompt: impl Into<String>,
        references: Vec<ReferenceImage>,
        options: GenerationOptions,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GenAiError::EmptyPrompt);
        }

        for reference in references.iter().filter(|r| r.is_subject()) {
            let marker = format!("[{}]", reference.reference_id);
            if !prompt.contains(&marker) {
                return Err(GenAiError::UnresolvedSubjectMarker(reference.reference_id));
            }
        }

        if options.image_count == 0 || options.image_count > MAX_IMAGE_COUNT {
            return Err(GenAiError::InvalidOption(format!(
                "image_count must be between 1 and {}, got {}",
                MAX_IMAGE_COUNT, options.image_count
            )));
        }

        Ok(Self {
            model_id: model_id.into(),
            prompt,
            references,
            options,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn references(&self) -> &[ReferenceImage] {
        &self.references
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

/// One entry of a generation response: either image bytes or a per-entry
/// decode failure carrying a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedImage {
    Image(Vec<u8>),
    Failed(String),
}

impl GeneratedImage {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            GeneratedImage::Image(bytes) => Some(bytes),
            GeneratedImage::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            GeneratedImage::Image(_) => None,
            GeneratedImage::Failed(reason) => Some(reason),
        }
    }
}

/// Ordered result of one generation call. An empty result is valid; the
/// caller decides how to report "no results" and partial failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    images: Vec<GeneratedImage>,
}

impl GenerationResult {
    pub fn new(images: Vec<GeneratedImage>) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.images.iter().filter(|i| i.bytes().is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.images.len() - self.succeeded()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedImage> {
        self.images.iter()
    }
}

impl IntoIterator for GenerationResult {
    type Item = GeneratedImage;
    type IntoIter = std::vec::IntoIter<GeneratedImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl FromIterator<GeneratedImage> for GenerationResult {
    fn from_iter<T: IntoIterator<Item = GeneratedImage>>(iter: T) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reference::{ReferenceSetBuilder, SubjectType};

    fn shoe_reference() -> Vec<ReferenceImage> {
        ReferenceSetBuilder::new()
            .subject_with_id(1, vec![1, 2, 3], "a shoe", SubjectType::Product)
            .build()
            .unwrap()
    }

    #[test]
    fn assemble_keeps_prompt_and_references() {
        let request = GenerationRequest::assemble(
            "modelX",
            "A shoe [1] on a beach",
            shoe_reference(),
            GenerationOptions::new().with_image_count(4),
        )
        .unwrap();

        assert_eq!(request.prompt(), "A shoe [1] on a beach");
        assert_eq!(request.references().len(), 1);
        assert_eq!(request.model_id(), "modelX");
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = GenerationRequest::assemble(
            "modelX",
            "   ",
            Vec::new(),
            GenerationOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GenAiError::EmptyPrompt));
    }

    #[test]
    fn subject_marker_must_appear_in_prompt() {
        let err = GenerationRequest::assemble(
            "modelX",
            "A shoe on a beach",
            shoe_reference(),
            GenerationOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GenAiError::UnresolvedSubjectMarker(1)));
    }

    #[test]
    fn image_count_bounds_are_enforced() {
        for bad in [0u32, 5] {
            let err = GenerationRequest::assemble(
                "modelX",
                "A beach",
                Vec::new(),
                GenerationOptions::new().with_image_count(bad),
            )
            .unwrap_err();
            assert!(matches!(err, GenAiError::InvalidOption(_)), "count {}", bad);
        }

        assert!(GenerationRequest::assemble(
            "modelX",
            "A beach",
            Vec::new(),
            GenerationOptions::new().with_image_count(4),
        )
        .is_ok());
    }

    #[test]
    fn result_counts_partial_failures() {
        let result = GenerationResult::new(vec![
            GeneratedImage::Image(vec![1]),
            GeneratedImage::Failed("no image payload".into()),
            GeneratedImage::Image(vec![2]),
        ]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.succeeded(), 2);
        assert_eq!(result.failed(), 1);
    }

    #[test]
    fn option_wire_strings() {
        assert_eq!(AspectRatio::Widescreen.as_str(), "16:9");
        assert_eq!(
            SafetyFilterLevel::BlockOnlyHigh.as_str(),
            "block_only_high"
        );
        assert_eq!(PersonGeneration::AllowAdult.as_str(), "allow_adult");
        assert_eq!(EditMode::BackgroundSwap.as_str(), "EDIT_MODE_BGSWAP");
    }
}
