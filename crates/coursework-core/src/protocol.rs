//! Authenticate → fetch → answer exchange with the grading service

use crate::config::Settings;
use crate::error::ProtocolError;
use crate::transport::{Exchange, HttpTransport, Transport};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Status part shared by every response of the grading service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    token: String,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    apikey: &'a str,
}

#[derive(Serialize)]
struct AnswerRequest<'a, S: ?Sized> {
    answer: &'a S,
}

/// Task payload for lessons that carry no fields besides the envelope
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoInput {}

/// A fetched task: the envelope, the lesson fields and the answer token
#[derive(Debug, Clone, Deserialize)]
pub struct Task<D> {
    /// Assigned after authentication, never part of the wire payload
    #[serde(skip)]
    pub token: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(flatten)]
    pub data: D,
}

/// Client for the grading service task protocol
#[derive(Clone)]
pub struct TaskClient {
    transport: Arc<dyn Transport>,
    api_key: String,
}

impl TaskClient {
    pub fn new(transport: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let transport = HttpTransport::new(&settings.aidevs_url, settings.task_timeout);
        Self::new(Arc::new(transport), &settings.aidevs_key)
    }

    /// Obtain a one-off token for the named task
    pub async fn authenticate(&self, task_name: &str) -> Result<String, ProtocolError> {
        let body = serde_json::to_value(AuthRequest {
            apikey: &self.api_key,
        })?;
        let raw = self
            .transport
            .exchange(Exchange::post_json(format!("/token/{task_name}"), body))
            .await?;
        let response: AuthResponse = serde_json::from_value(raw)?;

        if response.code != 0 {
            return Err(ProtocolError::AuthFailed {
                task: task_name.to_string(),
                code: response.code,
                msg: response.msg,
            });
        }
        if response.token.is_empty() {
            return Err(ProtocolError::EmptyToken {
                task: task_name.to_string(),
            });
        }
        Ok(response.token)
    }

    /// Authenticate and fetch the task, attaching the token to it
    pub async fn fetch<D: DeserializeOwned>(
        &self,
        task_name: &str,
    ) -> Result<Task<D>, ProtocolError> {
        let token = self.authenticate(task_name).await?;
        let raw = self
            .transport
            .exchange(Exchange::get(format!("/task/{token}")))
            .await?;

        let envelope: Envelope = serde_json::from_value(raw.clone())?;
        if envelope.code != 0 {
            return Err(ProtocolError::FetchFailed {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        let mut task: Task<D> = serde_json::from_value(raw)?;
        task.token = token;
        info!(task = task_name, msg = %task.msg, "fetched task");
        Ok(task)
    }

    /// Submit a solution for the task identified by `token`
    pub async fn answer<S>(&self, token: &str, solution: &S) -> Result<(), ProtocolError>
    where
        S: Serialize + ?Sized,
    {
        let body = serde_json::to_value(AnswerRequest { answer: solution })?;
        info!(answer = %body["answer"], "sending solution");
        let raw = self
            .transport
            .exchange(Exchange::post_json(format!("/answer/{token}"), body))
            .await?;

        let envelope: Envelope = serde_json::from_value(raw)?;
        if envelope.code != 0 {
            return Err(ProtocolError::AnswerFailed {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        info!(msg = %envelope.msg, "answer accepted");
        Ok(())
    }

    /// Ask the task endpoint a question as a form post and return its `answer`
    pub async fn ask(&self, token: &str, question: &str) -> Result<String, ProtocolError> {
        let fields = vec![("question".to_string(), question.to_string())];
        let raw = self
            .transport
            .exchange(Exchange::post_form(format!("/task/{token}"), fields))
            .await?;
        Ok(match raw.get("answer") {
            Some(Value::String(answer)) => answer.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }
}
