use thiserror::Error;

/// Failures of the task protocol exchange
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to send {method} request to {url}: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported response content type {content_type:?} from {url}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("failed to convert response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authentication for task {task} failed with code {code}: {msg}")]
    AuthFailed { task: String, code: i64, msg: String },

    #[error("authentication for task {task} returned an empty token")]
    EmptyToken { task: String },

    #[error("task fetch failed with code {code}: {msg}")]
    FetchFailed { code: i64, msg: String },

    #[error("answer was rejected with code {code}: {msg}")]
    AnswerFailed { code: i64, msg: String },
}

impl ProtocolError {
    /// True for both authentication failure variants
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailed { .. } | Self::EmptyToken { .. })
    }
}
