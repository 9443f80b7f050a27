//! rimagen - a Rust client library for Google Vertex AI Imagen.
//!
//! Covers text-to-image generation, reference-conditioned editing
//! (background swap, subject and control references, inpainting) and
//! virtual try-on. Prompt templating, reference assembly and request
//! validation are pure and synchronous; the only I/O is the predict call
//! behind [`vertex::PredictionService`].

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod vertex;

pub use config::VertexConfig;
pub use error::{GenAiError, Result};
pub use models::{
    AspectRatio, ControlType, EditMode, GeneratedImage, GenerationOptions, GenerationRequest,
    GenerationResult, MaskMode, ModelCategory, ModelInfo, PersonGeneration, ReferenceImage,
    ReferenceKind, ReferenceSetBuilder, RefinePromptRequest, SafetyFilterLevel, SubjectType,
    MAX_IMAGE_COUNT,
};
pub use prompt::PromptTemplate;
pub use vertex::{
    ContentService, ImageClient, PredictionService, TextClient, TryOnClient, TryOnRequest,
    VertexClient,
};
