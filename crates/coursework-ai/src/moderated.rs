//! Moderation-first access to the AI backend
//!
//! Every prompt passes the moderation check before the model sees it. A failed
//! check or a flagged prompt stops the call; the backend is never reached.

use crate::chat::{ChatMessage, ChatRequest, FunctionCall, FunctionDefinition, GPT3_5_TURBO, GPT4_VISION_PREVIEW};
use crate::error::AiError;
use crate::openai::{AiBackend, AudioFile};
use coursework_core::Backoff;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Retry policy for embedding creation
pub const EMBEDDING_BACKOFF: Backoff = Backoff::exponential(10, Duration::from_millis(100));

const EXCERPT_CHARS: usize = 80;

#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn AiBackend>,
    model: String,
    embedding_backoff: Backoff,
}

impl Assistant {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        Self {
            backend,
            model: GPT3_5_TURBO.to_string(),
            embedding_backoff: EMBEDDING_BACKOFF,
        }
    }

    /// Model used for chat and function calling
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_embedding_backoff(mut self, backoff: Backoff) -> Self {
        self.embedding_backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Plain moderation verdict, `true` when flagged
    pub async fn moderate(&self, text: &str) -> Result<bool, AiError> {
        self.backend
            .moderate(text)
            .await
            .map_err(|e| AiError::ModerationCheckFailed(Box::new(e)))
    }

    async fn ensure_allowed(&self, text: &str) -> Result<(), AiError> {
        if self.moderate(text).await? {
            return Err(AiError::PolicyViolation(excerpt(text)));
        }
        Ok(())
    }

    /// System prompt followed by user messages; only the system prompt is moderated
    pub async fn chat(&self, system: &str, users: &[&str]) -> Result<String, AiError> {
        self.ensure_allowed(system).await?;

        let mut messages = vec![ChatMessage::system(system)];
        messages.extend(users.iter().map(|user| ChatMessage::user(*user)));
        let reply = self
            .backend
            .complete(ChatRequest::new(self.model.clone(), messages))
            .await?;
        debug!(model = %self.model, "chat completed");
        Ok(reply.content)
    }

    /// Single turn with an assistant primer; only the system prompt is moderated
    pub async fn respond(&self, system: &str, user: &str, assistant: &str) -> Result<String, AiError> {
        self.ensure_allowed(system).await?;

        let messages = vec![
            ChatMessage::system(system),
            ChatMessage::user(user),
            ChatMessage::assistant(assistant),
        ];
        let reply = self
            .backend
            .complete(ChatRequest::new(self.model.clone(), messages))
            .await?;
        Ok(reply.content)
    }

    /// Let the model pick one of `functions`; the concatenated prompt is moderated
    pub async fn function_call(
        &self,
        system: &str,
        user: &str,
        assistant: &str,
        functions: Vec<FunctionDefinition>,
    ) -> Result<FunctionCall, AiError> {
        self.ensure_allowed(&format!("{system}{user}{assistant}"))
            .await?;

        let messages = vec![
            ChatMessage::system(system),
            ChatMessage::user(user),
            ChatMessage::assistant(assistant),
        ];
        let request = ChatRequest::new(self.model.clone(), messages).with_functions(functions);
        let reply = self.backend.complete(request).await?;
        let call = reply.function_call.ok_or(AiError::MissingFunctionCall)?;
        info!(function = %call.name, "model chose function");
        Ok(call)
    }

    /// Image-grounded chat; only the system prompt is moderated
    pub async fn see(
        &self,
        system: &str,
        user: &str,
        assistant: &str,
        image_url: &str,
    ) -> Result<String, AiError> {
        self.ensure_allowed(system).await?;

        let messages = vec![
            ChatMessage::system(system),
            ChatMessage::user_with_image(user, image_url),
            ChatMessage::assistant(assistant),
        ];
        let reply = self
            .backend
            .complete(ChatRequest::new(GPT4_VISION_PREVIEW, messages))
            .await?;
        Ok(reply.content)
    }

    /// Moderated embedding, retried with backoff after moderation passes
    pub async fn embedding(&self, text: &str) -> Result<Vec<f32>, AiError> {
        self.ensure_allowed(text).await?;

        let backend = &self.backend;
        self.embedding_backoff
            .retry("embedding", move || async move { backend.embed(text).await })
            .await
    }

    /// Transcription is not moderated, there is no prompt text to check
    pub async fn transcribe(&self, audio: AudioFile) -> Result<String, AiError> {
        self.backend.transcribe(audio).await
    }
}

fn excerpt(text: &str) -> String {
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}
