//! Lessons c04l04 and c04l05: point the grader at the self-hosted answering API

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_core::{NoInput, Task, TaskClient};

pub const KEY: &str = "c04l04";
pub const TASK: &str = "ownapi";

pub const PRO_KEY: &str = "c04l05";
pub const PRO_TASK: &str = "ownapipro";

pub const ANSWER_URL: &str = "https://gocraft.it/answer";

pub struct OwnApi {
    task: &'static str,
}

pub fn factory(_context: &LessonContext) -> Box<dyn Solver> {
    Box::new(OwnApi { task: TASK })
}

pub fn pro_factory(_context: &LessonContext) -> Box<dyn Solver> {
    Box::new(OwnApi { task: PRO_TASK })
}

#[async_trait]
impl Solver for OwnApi {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<NoInput> = server.fetch(self.task).await.stage("fetch task")?;
        submit(server, &task.token, ANSWER_URL).await
    }
}
