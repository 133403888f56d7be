//! Lesson c03l04: nearest archive entry to the question, by title embedding

use crate::error::{LessonError, Stage};
use crate::solver::{submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::Assistant;
use coursework_core::{Task, TaskClient};
use coursework_store::{Field, Role, SearchOptions, Tagged, VectorStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const KEY: &str = "c03l04";
pub const TASK: &str = "search";

pub const COLLECTION: &str = "aidevs2_c03l04";
const DATASET: &str = "small_archiwum1.json";

#[derive(Debug, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub question: String,
}

/// One entry of the news archive dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArchiveEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub date: String,
}

/// Archive entry as stored in the vector collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivePoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub title: String,
    pub url: String,
    pub info: String,
    pub date: String,
}

impl ArchivePoint {
    pub fn new(entry: ArchiveEntry, vector: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vector,
            title: entry.title,
            url: entry.url,
            info: entry.info,
            date: entry.date,
        }
    }
}

impl Tagged for ArchivePoint {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::text("id", Role::Id, |p: &Self| p.id.as_str(), |p: &mut Self, v| p.id = v),
            Field::floats(
                "vector",
                Role::Vector,
                |p: &Self| p.vector.as_slice(),
                |p: &mut Self, v| p.vector = v,
            ),
            Field::text(
                "title",
                Role::Payload("title"),
                |p: &Self| p.title.as_str(),
                |p: &mut Self, v| p.title = v,
            ),
            Field::text(
                "url",
                Role::Payload("url"),
                |p: &Self| p.url.as_str(),
                |p: &mut Self, v| p.url = v,
            ),
            Field::text(
                "info",
                Role::Payload("info"),
                |p: &Self| p.info.as_str(),
                |p: &mut Self, v| p.info = v,
            ),
            Field::text(
                "date",
                Role::Payload("date"),
                |p: &Self| p.date.as_str(),
                |p: &mut Self, v| p.date = v,
            ),
        ]
    }
}

pub struct Search {
    assistant: Assistant,
    store: VectorStore,
    dataset: PathBuf,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Search {
        assistant: context.assistant(),
        store: VectorStore::new(context.settings.qdrant_url.clone()),
        dataset: context.dataset(KEY, DATASET),
    })
}

pub fn read_archive(path: &Path) -> Result<Vec<ArchiveEntry>, LessonError> {
    let raw = std::fs::read(path).map_err(|source| LessonError::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| LessonError::Decode {
        what: path.display().to_string(),
        source,
    })
}

impl Search {
    /// Create and fill the collection unless it is already there
    async fn ensure_collection(&self) -> Result<(), LessonError> {
        if self.store.collection_exists(COLLECTION).await? {
            return Ok(());
        }
        let archive = read_archive(&self.dataset)?;
        if archive.is_empty() {
            return Err(LessonError::UnexpectedAnswer(
                "no archive entries found".to_string(),
            ));
        }
        self.store.create_collection(COLLECTION).await?;

        let mut points = Vec::with_capacity(archive.len());
        for entry in archive {
            let vector = self
                .assistant
                .embedding(&entry.title)
                .await
                .stage("embed archive title")?;
            points.push(ArchivePoint::new(entry, vector));
        }
        info!(count = points.len(), "embeddings created");
        self.store.upsert_many(COLLECTION, &points).await?;
        info!(collection = COLLECTION, "all entries stored");
        Ok(())
    }

    async fn answer(&self, question: &str) -> Result<String, LessonError> {
        self.ensure_collection().await.stage("prepare collection")?;
        let vector = self.assistant.embedding(question).await?;
        let hits: Vec<ArchivePoint> = self
            .store
            .search(COLLECTION, &vector, SearchOptions::default().with_limit(1))
            .await?;
        let best = hits
            .into_iter()
            .next()
            .ok_or_else(|| LessonError::UnexpectedAnswer(format!("no answer found for '{question}'")))?;
        info!(question, url = %best.url, "nearest entry");
        Ok(best.url)
    }
}

#[async_trait]
impl Solver for Search {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<Input> = server.fetch(TASK).await.stage("fetch task")?;
        let url = self
            .answer(&task.data.question)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &url).await
    }
}
