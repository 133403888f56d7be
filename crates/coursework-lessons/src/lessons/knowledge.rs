//! Lesson c04l01: route a question to population, currency or general knowledge

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::{Assistant, FunctionCall, FunctionDefinition, GPT4_0613};
use coursework_core::{Task, TaskClient};
use coursework_knowledge::{CountryKnowledge, CurrencyKnowledge, InfoField};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

pub const KEY: &str = "c04l01";
pub const TASK: &str = "knowledge";

pub const GET_POPULATION: &str = "GetPopulation";
pub const GET_CURRENCY: &str = "GetCurrency";
pub const GET_GENERAL_ANSWER: &str = "GetGeneralAnswer";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
struct PopulationParams {
    country: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyParams {
    code: String,
}

#[derive(Debug, Deserialize)]
struct GeneralParams {
    question: String,
}

pub fn function_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition::new(
            GET_POPULATION,
            "Get population of a country",
            json!({
                "type": "object",
                "properties": {
                    "country": {"type": "string", "description": "The country name in english, e.g. Germany, USA"}
                },
                "required": ["country"]
            }),
        ),
        FunctionDefinition::new(
            GET_CURRENCY,
            "Get actual currency",
            json!({
                "type": "object",
                "properties": {
                    "code": {"type": "string", "description": "The ISO4217 alpha code for the currency, e.g. EUR for euro, USD for United States Dollar"}
                },
                "required": ["code"]
            }),
        ),
        FunctionDefinition::new(
            GET_GENERAL_ANSWER,
            "Get answer for general knowledge",
            json!({
                "type": "object",
                "properties": {
                    "question": {"type": "string", "description": "The question you were asked"}
                },
                "required": ["question"]
            }),
        ),
    ]
}

fn params<T: DeserializeOwned>(call: &FunctionCall) -> Result<T, LessonError> {
    serde_json::from_str(&call.arguments).map_err(|source| LessonError::Decode {
        what: format!("{} arguments '{}'", call.name, call.arguments),
        source,
    })
}

pub struct Knowledge {
    assistant: Assistant,
    countries: CountryKnowledge,
    currencies: CurrencyKnowledge,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Knowledge {
        assistant: context.assistant().with_model(GPT4_0613),
        countries: CountryKnowledge::new(),
        currencies: CurrencyKnowledge::new(),
    })
}

impl Knowledge {
    async fn call(&self, call: &FunctionCall) -> Result<String, LessonError> {
        info!(function = %call.name, arguments = %call.arguments, "calling function");
        match call.name.as_str() {
            GET_CURRENCY => {
                let p: CurrencyParams = params(call)?;
                let rate = self.currencies.todays_rate(&p.code).await?;
                Ok(format!("{rate:.6}"))
            }
            GET_POPULATION => {
                let p: PopulationParams = params(call)?;
                let info = self
                    .countries
                    .info(&p.country, &[InfoField::Population])
                    .await?;
                Ok(info.population.to_string())
            }
            GET_GENERAL_ANSWER => {
                let p: GeneralParams = params(call)?;
                Ok(self.assistant.chat("", &[p.question.as_str()]).await?)
            }
            other => Err(LessonError::UnsupportedFunction(other.to_string())),
        }
    }

    async fn answer(&self, question: &str) -> Result<String, LessonError> {
        let call = self
            .assistant
            .function_call("", question, "", function_definitions())
            .await
            .stage("make function calling")?;
        self.call(&call).await.stage("call function")
    }
}

#[async_trait]
impl Solver for Knowledge {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let answer = self
            .answer(&task.data.question)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &answer).await
    }
}
