//! Lesson c04l03: colour of the gnome's hat in the task picture

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{Task, TaskClient};
use serde::Deserialize;

pub const KEY: &str = "c04l03";
pub const TASK: &str = "gnome";

const SYSTEM: &str = r#"
I am supposed to watch only pictures with dwarfs.
If there is no dwarf nor gnome on the picture answer shortly: "error".
If there is a dwarf or gnome on the picture answer ultra-concise and in polish.
"#;
const QUESTION: &str = "What color is the hat of a dwarf?";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub url: String,
}

pub struct Gnome {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Gnome {
        assistant: context.assistant(),
    })
}

#[async_trait]
impl Solver for Gnome {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let answer = self
            .assistant
            .see(SYSTEM, QUESTION, "", &task.data.url)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &answer).await
    }
}
