//! Lesson c02l05: a function definition for adding a user

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::FunctionDefinition;
use coursework_core::{NoInput, Task, TaskClient};
use serde_json::json;

pub const KEY: &str = "c02l05";
pub const TASK: &str = "functions";

pub struct Functions;

pub fn factory(_context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Functions)
}

pub fn add_user_definition() -> FunctionDefinition {
    FunctionDefinition::new(
        "addUser",
        "Add user to the system",
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Name of the user"},
                "surname": {"type": "string", "description": "Surname of the user"},
                "year": {"type": "integer", "description": "Year of birth of the user"}
            },
            "required": ["name", "surname", "year"]
        }),
    )
}

#[async_trait]
impl Solver for Functions {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<NoInput> = server.fetch(TASK).await.stage("fetch task")?;
        submit(server, &task.token, &add_user_definition()).await
    }
}
