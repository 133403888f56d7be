//! Lesson c04l02: classify a note as a ToDo item or a Calendar entry

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use chrono::NaiveDate;
use coursework_ai::{Assistant, FunctionDefinition, GPT4_0613};
use coursework_core::{Task, TaskClient};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const KEY: &str = "c04l02";
pub const TASK: &str = "tools";

pub const TODO: &str = "ToDo";
pub const CALENDAR: &str = "Calendar";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub question: String,
}

/// Tool choice submitted as the answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub tool: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
}

pub fn function_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition::new(
            TODO,
            "Reminder that I need to do something without any date nor time given",
            json!({
                "type": "object",
                "properties": {
                    "tool": {"type": "string", "description": "Must always have following value: ToDo"},
                    "desc": {"type": "string", "description": "Something I need to do"}
                },
                "required": ["tool", "desc"]
            }),
        ),
        FunctionDefinition::new(
            CALENDAR,
            "A meeting or event that I am supposed to have in a given date",
            json!({
                "type": "object",
                "properties": {
                    "tool": {"type": "string", "description": "Must always have following value: Calendar"},
                    "desc": {"type": "string", "description": "The meeting or event description"},
                    "date": {"type": "string", "description": "The date in format in format YYYY-MM-DD"}
                },
                "required": ["tool", "desc", "date"]
            }),
        ),
    ]
}

/// System prompt anchoring relative dates, e.g. "today is Monday, 02 January 2006"
pub fn today_prompt(today: NaiveDate) -> String {
    format!("today is {}", today.format("%A, %d %B %Y"))
}

pub struct Tools {
    assistant: Assistant,
    today: NaiveDate,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Tools {
        assistant: context.assistant().with_model(GPT4_0613),
        today: context.today,
    })
}

impl Tools {
    async fn answer(&self, question: &str) -> Result<ToolEntry, LessonError> {
        let call = self
            .assistant
            .function_call(&today_prompt(self.today), question, "", function_definitions())
            .await
            .stage("make function calling")?;
        serde_json::from_str(&call.arguments).map_err(|source| LessonError::Decode {
            what: format!("{} arguments '{}'", call.name, call.arguments),
            source,
        })
    }
}

#[async_trait]
impl Solver for Tools {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let entry = self
            .answer(&task.data.question)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &entry).await
    }
}
