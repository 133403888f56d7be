//! HTTP client for the AI service

use crate::chat::{ChatReply, ChatRequest};
use crate::error::AiError;
use async_trait::async_trait;
use coursework_core::Settings;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const MODERATION_MODEL: &str = "text-moderation-latest";
pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const WHISPER_MODEL: &str = "whisper-1";

const TRANSCRIPTION_LANGUAGE: &str = "pl";

/// Raw model operations, without moderation
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// `true` when the text breaks the usage policy
    async fn moderate(&self, input: &str) -> Result<bool, AiError>;

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, AiError>;

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AiError>;

    async fn transcribe(&self, audio: AudioFile) -> Result<String, AiError>;
}

/// Audio bytes with the file name the service uses to detect the format
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    /// Download from `url`, naming the file after the last path segment
    pub async fn download(url: &str) -> Result<Self, AiError> {
        let failed = |source| AiError::Download {
            url: url.to_string(),
            source,
        };
        let response = reqwest::get(url)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?;
        let bytes = response.bytes().await.map_err(failed)?;

        let file_name = url.rsplit('/').next().unwrap_or(url).to_string();
        debug!(url, file_name = %file_name, size = bytes.len(), "audio downloaded");
        Ok(Self {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Deserialize)]
struct ModerationResult {
    flagged: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Bearer-authenticated client for the OpenAI HTTP API
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.openai_url.clone(), settings.openai_key.clone())
    }

    async fn send<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<R, AiError> {
        let transport = |source| AiError::Transport { operation, source };
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AiBackend for OpenAiClient {
    async fn moderate(&self, input: &str) -> Result<bool, AiError> {
        let request = self.client.post(self.url("/v1/moderations")).json(&json!({
            "input": input,
            "model": MODERATION_MODEL,
        }));
        let response: ModerationResponse = self.send("moderation", request).await?;
        response
            .results
            .first()
            .map(|result| result.flagged)
            .ok_or(AiError::EmptyResponse("moderation"))
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, AiError> {
        debug!(model = %request.model, messages = request.messages.len(), "chat completion");
        let request = self
            .client
            .post(self.url("/v1/chat/completions"))
            .json(&request);
        let response: CompletionResponse = self.send("chat completion", request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(AiError::EmptyResponse("chat completion"))
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AiError> {
        let request = self.client.post(self.url("/v1/embeddings")).json(&json!({
            "input": [input],
            "model": EMBEDDING_MODEL,
        }));
        let response: EmbeddingResponse = self.send("embedding", request).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or(AiError::EmptyResponse("embedding"))
    }

    async fn transcribe(&self, audio: AudioFile) -> Result<String, AiError> {
        let file = reqwest::multipart::Part::bytes(audio.bytes).file_name(audio.file_name);
        let form = reqwest::multipart::Form::new()
            .text("model", WHISPER_MODEL)
            .text("language", TRANSCRIPTION_LANGUAGE)
            .text("response_format", "json")
            .text("temperature", "0")
            .part("file", file);
        let request = self
            .client
            .post(self.url("/v1/audio/transcriptions"))
            .multipart(form);
        let response: TranscriptionResponse = self.send("transcription", request).await?;
        Ok(response.text)
    }
}
