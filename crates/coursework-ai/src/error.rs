use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("failed to moderate entry: {0}")]
    ModerationCheckFailed(#[source] Box<AiError>),

    #[error("entry breaks the usage policy: {0}")]
    PolicyViolation(String),

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("AI service answered {status}: {body}")]
    Api { status: u16, body: String },

    #[error("empty {0} response received")]
    EmptyResponse(&'static str),

    #[error("no function call in the completion")]
    MissingFunctionCall,

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode AI service response: {0}")]
    Decode(#[from] serde_json::Error),
}
