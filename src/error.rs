use std::fmt;

#[derive(Debug)]
pub enum GenAiError {
    ConfigError(String),
    /// A prompt template placeholder had no bound value.
    TemplateError(String),
    /// Two reference entries in one request carried the same id.
    DuplicateReferenceId(u32),
    /// A mask reference omitted its image without a mode that allows it.
    MissingMaskImage(u32),
    /// A raw, subject or control reference omitted its image.
    MissingReferenceImage(u32),
    EmptyPrompt,
    /// A subject reference id never appears as "[id]" in the prompt.
    UnresolvedSubjectMarker(u32),
    InvalidOption(String),
    RequestError(String),
    ResponseError(String),
    SerializationError(String),
    HttpError(String),
    /// Failure signal from the hosted model, passed through unchanged.
    ProviderError(String),
}

impl fmt::Display for GenAiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenAiError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            GenAiError::TemplateError(key) => {
                write!(f, "Template error: no value bound for placeholder '{}'", key)
            }
            GenAiError::DuplicateReferenceId(id) => {
                write!(f, "Duplicate reference id: {}", id)
            }
            GenAiError::MissingMaskImage(id) => write!(
                f,
                "Mask reference {} has no image and its mask mode requires one",
                id
            ),
            GenAiError::MissingReferenceImage(id) => {
                write!(f, "Reference {} requires an image", id)
            }
            GenAiError::EmptyPrompt => write!(f, "Prompt must not be empty"),
            GenAiError::UnresolvedSubjectMarker(id) => write!(
                f,
                "Prompt does not contain the marker [{}] for subject reference {}",
                id, id
            ),
            GenAiError::InvalidOption(msg) => write!(f, "Invalid option: {}", msg),
            GenAiError::RequestError(msg) => write!(f, "Request error: {}", msg),
            GenAiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            GenAiError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            GenAiError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            GenAiError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for GenAiError {}

pub type Result<T> = std::result::Result<T, GenAiError>;
