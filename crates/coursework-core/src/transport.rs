//! JSON-over-HTTP transport for the task protocol

use crate::error::ProtocolError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Request body of a protocol call
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single request/response exchange, addressed relative to the service root
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub method: Method,
    pub path: String,
    pub body: Body,
}

impl Exchange {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: Body::Empty,
        }
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Body::Json(body),
        }
    }

    pub fn post_form(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Body::Form(fields),
        }
    }
}

/// Sends an exchange and returns the decoded JSON document
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, exchange: Exchange) -> Result<Value, ProtocolError>;
}

/// reqwest-backed transport with a fixed per-call timeout
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, exchange: Exchange) -> Result<Value, ProtocolError> {
        let method = exchange.method.as_str();
        let url = format!("{}{}", self.base_url, exchange.path);
        debug!(method, url = %url, "sending request");

        let request = match exchange.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .timeout(self.timeout);
        let request = match &exchange.body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Form(fields) => request.form(fields),
        };

        let response = request
            .send()
            .await
            .map_err(|source| ProtocolError::Transport {
                method,
                url: url.clone(),
                source,
            })?;

        // Status is not inspected, the JSON `code` decides
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            return Err(ProtocolError::UnsupportedContentType { url, content_type });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ProtocolError::Transport {
                method,
                url: url.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Media type check ignoring parameters such as `charset`
pub fn is_json_content_type(header: &str) -> bool {
    header
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
