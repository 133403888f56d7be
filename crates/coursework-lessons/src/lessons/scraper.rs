//! Lesson c03l02: answer a question from a scraped article

use super::{fenced_context, CONTEXT_RULES};
use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{Task, TaskClient};
use coursework_knowledge::Scraper as PageScraper;
use serde::Deserialize;
use tracing::info;

pub const KEY: &str = "c03l02";
pub const TASK: &str = "scraper";

#[derive(Debug, Deserialize)]
pub struct Input {
    /// URL of the article
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub question: String,
}

pub struct Scraper {
    assistant: Assistant,
    pages: PageScraper,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Scraper {
        assistant: context.assistant(),
        pages: PageScraper::new(),
    })
}

impl Scraper {
    async fn answer(&self, input: &Input) -> Result<String, LessonError> {
        let article = self
            .pages
            .fetch_with_retry(&input.input)
            .await
            .stage("scrape context")?;
        let system = format!("{CONTEXT_RULES}{}", fenced_context(&article));
        let answer = self
            .assistant
            .chat(&system, &[input.question.as_str()])
            .await?;
        info!(question = %input.question, answer = %answer, "answered from article");
        Ok(answer)
    }
}

#[async_trait]
impl Solver for Scraper {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let answer = self.answer(&task.data).await.stage("find solution")?;
        submit(server, &task.token, &answer).await
    }
}
