//! Lesson 4a: flag each input that breaks the usage policy

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{Task, TaskClient};
use serde::Deserialize;
use tracing::debug;

pub const KEY: &str = "4a";
pub const TASK: &str = "moderation";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub input: Vec<String>,
}

pub struct Moderation {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Moderation {
        assistant: context.assistant(),
    })
}

impl Moderation {
    /// `1` for every flagged input, `0` otherwise
    async fn verdicts(&self, inputs: &[String]) -> Result<Vec<u8>, LessonError> {
        let mut verdicts = Vec::with_capacity(inputs.len());
        for input in inputs {
            let flagged = self.assistant.moderate(input).await?;
            debug!(input = %input, flagged, "moderated");
            verdicts.push(u8::from(flagged));
        }
        Ok(verdicts)
    }
}

#[async_trait]
impl Solver for Moderation {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let verdicts = self
            .verdicts(&task.data.input)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &verdicts).await
    }
}
