//! Lesson 4b: write one blog chapter per requested topic

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::{AiError, Assistant};
use coursework_core::{Task, TaskClient};
use serde::Deserialize;
use tracing::debug;

pub const KEY: &str = "4b";
pub const TASK: &str = "blogger";

const SYSTEM: &str = "As a cuisine blogger I want to create a blog post in polish about pizza Margarita.
The blog post is divided on chapters. The chapter must describe only one topic which is";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub blog: Vec<String>,
}

pub struct Blogger {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Blogger {
        assistant: context.assistant(),
    })
}

impl Blogger {
    async fn chapters(&self, topics: &[String]) -> Result<Vec<String>, LessonError> {
        let mut chapters = Vec::with_capacity(topics.len());
        for topic in topics {
            let entry = format!("{SYSTEM}{topic}");
            if self.assistant.moderate(&entry).await? {
                return Err(AiError::PolicyViolation(entry).into());
            }
            let chapter = self.assistant.chat(SYSTEM, &[topic.as_str()]).await?;
            debug!(topic = %topic, "chapter written");
            chapters.push(chapter);
        }
        Ok(chapters)
    }
}

#[async_trait]
impl Solver for Blogger {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let chapters = self
            .chapters(&task.data.blog)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &chapters).await
    }
}
