use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl ClientError {
    /// The user-facing message sent by the server, when there is one worth showing.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Unauthenticated(msg)
            | ClientError::AccessDenied(msg)
            | ClientError::Validation(msg)
            | ClientError::NotFound(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Alert text for this error, falling back when the server said nothing useful.
    pub fn alert_text(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
