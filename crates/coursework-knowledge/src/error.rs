use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build request URL from {base}: {reason}")]
    InvalidUrl { base: String, reason: String },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported response content type {content_type:?} from {url}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("expected exactly one result from {url}, got {count}")]
    AmbiguousResult { url: String, count: usize },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
