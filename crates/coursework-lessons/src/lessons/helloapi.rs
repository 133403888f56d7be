//! Lesson 1: echo the cookie handed out with the task

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_core::{Task, TaskClient};
use serde::Deserialize;

pub const KEY: &str = "1";
pub const TASK: &str = "helloapi";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub cookie: String,
}

pub struct HelloApi;

pub fn factory(_context: &LessonContext) -> Box<dyn Solver> {
    Box::new(HelloApi)
}

#[async_trait]
impl Solver for HelloApi {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        submit(server, &task.token, &task.data.cookie).await
    }
}
