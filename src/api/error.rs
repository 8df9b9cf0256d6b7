use thiserror::Error;

pub const GENERIC_ERROR: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authorised")]
    Unauthorized(Option<String>),

    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("could not reach the server")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response from the server")]
    Decode(#[source] reqwest::Error),

    #[error("could not encode the request")]
    Encode(#[from] serde_json::Error),

    #[error("could not read {path}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Text shown to the user: the backend's `message` when it sent one
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(Some(message)) | ApiError::Status { message: Some(message), .. } => {
                message.clone()
            }
            ApiError::Unauthorized(None) => "Session expired, please sign in again".to_string(),
            ApiError::Transport(_) => "Could not reach the server".to_string(),
            ApiError::File { path, .. } => format!("Could not read {}", path),
            ApiError::Status { message: None, .. } | ApiError::Decode(_) | ApiError::Encode(_) => {
                GENERIC_ERROR.to_string()
            }
        }
    }

    /// The `message` field of the backend's error body, if it sent one
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(message) | ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
