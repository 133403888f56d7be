//! The solver seam and what every solver is built from

use crate::error::{LessonError, Stage};
use async_trait::async_trait;
use chrono::NaiveDate;
use coursework_ai::{AiBackend, Assistant, OpenAiClient};
use coursework_core::{Settings, TaskClient};
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Fetches a task, computes its answer and submits it
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError>;
}

/// Everything a lesson factory may draw on
#[derive(Clone)]
pub struct LessonContext {
    pub settings: Settings,
    pub ai: Arc<dyn AiBackend>,
    /// Injected so date-dependent prompts are reproducible
    pub today: NaiveDate,
}

impl LessonContext {
    pub fn new(settings: Settings) -> Self {
        let ai = Arc::new(OpenAiClient::from_settings(&settings));
        Self {
            settings,
            ai,
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_backend(mut self, ai: Arc<dyn AiBackend>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Moderated assistant on the default chat model
    pub fn assistant(&self) -> Assistant {
        Assistant::new(Arc::clone(&self.ai))
    }

    pub fn dataset(&self, lesson: &str, file: &str) -> PathBuf {
        self.settings.dataset(lesson, file)
    }
}

/// Submit `answer` for the task behind `token`
pub(crate) async fn submit<S>(server: &TaskClient, token: &str, answer: &S) -> Result<(), LessonError>
where
    S: Serialize + Debug + Sync + ?Sized,
{
    info!(solution = ?answer, "solution found");
    server.answer(token, answer).await.stage("send solution")
}

/// Text after the last occurrence of `phrase`, or the whole text without it
pub(crate) fn after_phrase<'a>(text: &'a str, phrase: &str) -> &'a str {
    match text.rfind(phrase) {
        Some(at) => &text[at + phrase.len()..],
        None => text,
    }
}
