use crate::error::KnowledgeError;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GET `url`, require 200 and decode the JSON body
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, KnowledgeError> {
    debug!(url, "GET");
    let request_failed = |source| KnowledgeError::Request {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(request_failed)?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(KnowledgeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(request_failed)?;
    serde_json::from_slice(&body).map_err(|source| KnowledgeError::Decode {
        url: url.to_string(),
        source,
    })
}
