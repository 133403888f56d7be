//! Lesson c01l05: ask the grader a question and judge whether it answered it

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{NoInput, Task, TaskClient};
use tracing::info;

pub const KEY: &str = "c01l05";
pub const TASK: &str = "liar";

pub const QUESTION: &str = "What is a capital of Poland?";

pub struct Liar {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Liar {
        assistant: context.assistant(),
    })
}

fn judge_prompt(question: &str) -> String {
    format!(
        "Keep answers simple - YES, NO without dot. Having a question \"{question}\". Can you answer it in the following way "
    )
}

#[async_trait]
impl Solver for Liar {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<NoInput> = server.fetch(TASK).await.stage("fetch task")?;
        let reply = server
            .ask(&task.token, QUESTION)
            .await
            .stage("ask question")?;
        let verdict = self
            .assistant
            .chat(&judge_prompt(QUESTION), &[reply.as_str()])
            .await
            .stage("find solution")?;
        info!(reply = %reply, verdict = %verdict, "answer judged");
        submit(server, &task.token, &verdict).await
    }
}
