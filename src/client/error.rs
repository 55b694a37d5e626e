/// Errors talking to the backend service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Network failure, refused connection or timeout
    #[error("Request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success HTTP status
    #[error("Server error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Response body was not the expected JSON document
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
