//! Lesson c02l03: embedding of the phrase named in the task message

use crate::error::{LessonError, Stage};
use crate::solver::{after_phrase, submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{NoInput, Task, TaskClient};

pub const KEY: &str = "c02l03";
pub const TASK: &str = "embedding";

const PHRASE: &str = "Send me just array of params: ";

pub struct Embedding {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Embedding {
        assistant: context.assistant(),
    })
}

#[async_trait]
impl Solver for Embedding {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<NoInput> = server.fetch(TASK).await.stage("fetch task")?;
        let text = after_phrase(&task.msg, PHRASE);
        let embedding = self
            .assistant
            .embedding(text)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &embedding).await
    }
}
