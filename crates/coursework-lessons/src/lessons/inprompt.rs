//! Lesson c02l02: answer about a person using only the facts that start with their name

use super::{fenced_context, CONTEXT_RULES};
use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{Task, TaskClient};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

pub const KEY: &str = "c02l02";
pub const TASK: &str = "inprompt";

const NAME_REQUEST: &str = "give only the name";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub question: String,
}

pub struct InPrompt {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(InPrompt {
        assistant: context.assistant(),
    })
}

/// Facts keyed by their first word, in input order
pub fn facts_by_name(facts: &[String]) -> HashMap<&str, Vec<&str>> {
    let mut by_name: HashMap<&str, Vec<&str>> = HashMap::new();
    for fact in facts {
        let name = fact.split(' ').next().unwrap_or_default();
        by_name.entry(name).or_default().push(fact.as_str());
    }
    by_name
}

impl InPrompt {
    async fn answer(&self, input: &Input) -> Result<String, LessonError> {
        let by_name = facts_by_name(&input.input);
        let name = self
            .assistant
            .chat(&input.question, &[NAME_REQUEST])
            .await?;
        let facts = by_name.get(name.trim()).ok_or_else(|| {
            LessonError::UnexpectedAnswer(format!("asked name {name} does not exist in fact database"))
        })?;

        let mut context = String::new();
        for fact in facts {
            context.push_str(fact);
            context.push('\n');
        }
        let system = format!("{CONTEXT_RULES}{}", fenced_context(&context));
        let answer = self
            .assistant
            .chat(&system, &[input.question.as_str()])
            .await?;
        info!(question = %input.question, answer = %answer, "answered from context");
        Ok(answer)
    }
}

#[async_trait]
impl Solver for InPrompt {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let answer = self.answer(&task.data).await.stage("find solution")?;
        submit(server, &task.token, &answer).await
    }
}
