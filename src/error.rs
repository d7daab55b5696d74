use thiserror::Error;

/// Coarse classification of an [`ImperiumError`], for callers that need to
/// branch on the failure without parsing the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    Configuration,
    Authentication,
    RateLimited,
    Remote,
    Transport,
    MalformedResponse,
    Upload,
}

#[derive(Error, Debug)]
pub enum ImperiumError {
    #[error("No API key configured: set GROQ_API_KEY")]
    MissingApiKey,

    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Rate limited by completion service: {message}")]
    RateLimited { message: String },

    #[error("Completion API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "groq")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Empty completion response: {0}")]
    EmptyResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ImperiumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImperiumError::MissingApiKey | ImperiumError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            ImperiumError::Authentication { .. } => ErrorKind::Authentication,
            ImperiumError::RateLimited { .. } => ErrorKind::RateLimited,
            ImperiumError::Api { .. } => ErrorKind::Remote,
            #[cfg(feature = "groq")]
            ImperiumError::Http(e) if e.is_decode() => ErrorKind::MalformedResponse,
            #[cfg(feature = "groq")]
            ImperiumError::Http(_) => ErrorKind::Transport,
            ImperiumError::EmptyResponse(_) | ImperiumError::SerializationError(_) => {
                ErrorKind::MalformedResponse
            }
            ImperiumError::Csv(_)
            | ImperiumError::MalformedTable(_)
            | ImperiumError::IoError(_) => ErrorKind::Upload,
            ImperiumError::MissingInput(_) | ImperiumError::UnknownDocumentType(_) => {
                ErrorKind::MissingInput
            }
        }
    }

    /// Text shown to the user in place of a completion.
    pub fn display_text(&self) -> String {
        format!("Error: {}", self)
    }
}

pub type Result<T> = std::result::Result<T, ImperiumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_prefix() {
        let err = ImperiumError::Authentication {
            status: 401,
            message: "Invalid API Key".to_string(),
        };
        assert_eq!(
            err.display_text(),
            "Error: Authentication failed (status 401): Invalid API Key"
        );
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_kinds_are_distinguishable() {
        assert_eq!(ImperiumError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            ImperiumError::RateLimited {
                message: "slow down".into()
            }
            .kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(
            ImperiumError::EmptyResponse("no choices".into()).kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            ImperiumError::MissingInput("context".into()).kind(),
            ErrorKind::MissingInput
        );
    }
}
