use thiserror::Error;

/// Main error type for Procura
#[derive(Error, Debug)]
pub enum ProcuraError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("UI error: {0}")]
    UIError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors surfaced by the remote query gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl GatewayError {
    /// Human-readable description used when rendering an error reply
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(e) => {
                if e.is_timeout() {
                    "The server took too long to respond".to_string()
                } else if e.is_connect() {
                    "Could not reach the server".to_string()
                } else {
                    format!("Request failed: {}", e)
                }
            }
            GatewayError::Api { message, .. } => message.clone(),
        }
    }
}
