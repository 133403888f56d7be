//! Lesson c03l03: collect hints until the model can name the person

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::{Assistant, GPT4};
use coursework_core::{Task, TaskClient};
use serde::Deserialize;
use tracing::info;

pub const KEY: &str = "c03l03";
pub const TASK: &str = "whoami";

const UNKNOWN: &str = "I don't know";

const RULES: &str = r#"
Strict rules of this conversation:
- I guess a person name based on facts you give me
- I'll always skip any comments entirely
- I keep my answers ultra-concise
- I'm always truthful and honestly say "I don't know" when you ask me about something beyond my current knowledge
- If I am not sure the anser I say "I don't know"
- I answer only with a name of the person
- I answer only in polish
- I answer only if I am 100% sure
"#;

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub hint: String,
}

pub struct WhoAmI {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(WhoAmI {
        assistant: context.assistant().with_model(GPT4),
    })
}

fn is_guess(answer: &str) -> bool {
    let answer = answer.trim();
    !answer.is_empty() && answer != UNKNOWN
}

impl WhoAmI {
    /// Each extra hint costs a fresh task fetch; the first task's token stays in use
    async fn guess(&self, server: &TaskClient, first_hint: &str) -> Result<String, LessonError> {
        let mut facts: Vec<String> = Vec::new();
        if !first_hint.is_empty() {
            facts.push(first_hint.to_string());
        }
        loop {
            if !facts.is_empty() {
                let prompt = format!("\nFacts:\n{}", facts.join("\n"));
                let answer = self.assistant.respond(RULES, &prompt, "").await?;
                info!(hints = facts.len(), answer = %answer, "guessed");
                if is_guess(&answer) {
                    return Ok(answer);
                }
            }
            let more: Task<Input> = server.fetch(TASK).await.stage("fetch more hints")?;
            facts.push(more.data.hint);
        }
    }
}

#[async_trait]
impl Solver for WhoAmI {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let answer = self
            .guess(server, &task.data.hint)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &answer).await
    }
}
