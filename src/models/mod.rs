pub mod common;
pub mod image;
pub mod reference;
pub mod text;

pub use common::{catalog, ModelCategory, ModelInfo};
pub use image::{
    AspectRatio, EditMode, GeneratedImage, GenerationOptions, GenerationRequest,
    GenerationResult, PersonGeneration, SafetyFilterLevel, MAX_IMAGE_COUNT,
};
pub use reference::{
    ControlType, MaskMode, ReferenceImage, ReferenceKind, ReferenceSetBuilder, SubjectType,
};
pub use text::RefinePromptRequest;
