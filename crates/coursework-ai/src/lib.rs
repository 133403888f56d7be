//! AI-service client and the moderation-first wrapper used by the lessons

mod chat;
mod error;
mod moderated;
mod openai;

pub use chat::{
    ChatMessage, ChatReply, ChatRequest, ChatRole, Content, ContentPart, FunctionCall,
    FunctionDefinition, ImageUrl, GPT3_5_TURBO, GPT4, GPT4_0613, GPT4_VISION_PREVIEW,
};
pub use error::AiError;
pub use moderated::{Assistant, EMBEDDING_BACKOFF};
pub use openai::{AiBackend, AudioFile, OpenAiClient, EMBEDDING_MODEL, MODERATION_MODEL, WHISPER_MODEL};
