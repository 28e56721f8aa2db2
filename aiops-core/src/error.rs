/// Failure of the side-effecting action endpoint. Never masked by synthetic
/// data; callers decide how to report it.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("action request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("action endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed action response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ActionError {
    /// Status code when the backend answered with a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
