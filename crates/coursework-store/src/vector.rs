//! Qdrant collection and points adapter

use crate::codec::{Record, Schema, Tagged};
use crate::error::StoreError;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Dimensionality of embedding-backed collections
pub const VECTOR_SIZE: usize = 1536;

const DEFAULT_SEGMENT_NUMBER: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u64,
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

#[derive(Deserialize)]
struct ListResponse {
    result: CollectionList,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: Value,
    #[serde(default)]
    payload: Option<Map<String, Value>>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

impl ScoredPoint {
    fn into_record(self) -> Record {
        let id = match self.id {
            Value::String(id) => id,
            other => other.to_string(),
        };
        let payload = self
            .payload
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                _ => None,
            })
            .collect();
        Record {
            id,
            vector: self.vector.unwrap_or_default(),
            payload,
        }
    }
}

/// Cosine-distance vector store reached over the Qdrant HTTP API
pub struct VectorStore {
    client: reqwest::Client,
    base_url: String,
    vector_size: usize,
}

impl VectorStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            vector_size: VECTOR_SIZE,
        }
    }

    pub fn with_vector_size(mut self, vector_size: usize) -> Self {
        self.vector_size = vector_size;
        self
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, StoreError> {
        let http = |source| StoreError::Http {
            operation: operation.to_string(),
            source,
        };
        let response = request.send().await.map_err(http)?;
        let status = response.status();
        let body = response.text().await.map_err(http)?;

        if !status.is_success() {
            return Err(StoreError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), StoreError> {
        if vector.len() != self.vector_size {
            return Err(StoreError::InvalidVectorDimensions {
                expected: self.vector_size,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Lists every collection and checks membership
    pub async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let url = format!("{}/collections", self.base_url);
        let raw = self.send("list collections", self.client.get(url)).await?;
        let listed: ListResponse = serde_json::from_value(raw)?;
        Ok(listed.result.collections.iter().any(|c| c.name == name))
    }

    /// Fails if the collection already exists
    pub async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        let url = format!("{}/collections/{name}", self.base_url);
        let body = json!({
            "vectors": {"size": self.vector_size, "distance": "Cosine"},
            "optimizers_config": {"default_segment_number": DEFAULT_SEGMENT_NUMBER},
        });
        self.send(
            &format!("create collection '{name}'"),
            self.client.put(url).json(&body),
        )
        .await?;
        info!(collection = name, "collection created");
        Ok(())
    }

    pub async fn upsert(&self, name: &str, record: &Record) -> Result<(), StoreError> {
        self.check_dimensions(&record.vector)?;
        let url = format!("{}/collections/{name}/points?wait=true", self.base_url);
        let body = json!({
            "points": [{
                "id": record.id,
                "vector": record.vector,
                "payload": record.payload,
            }]
        });
        self.send("upsert point", self.client.put(url).json(&body))
            .await?;
        debug!(collection = name, id = %record.id, "point upserted");
        Ok(())
    }

    /// One upsert call per item, in order, stopping at the first failure
    pub async fn upsert_many<T: Tagged>(&self, name: &str, items: &[T]) -> Result<(), StoreError> {
        let schema = Schema::<T>::of()?;
        for item in items {
            self.upsert(name, &schema.encode(item)).await?;
        }
        Ok(())
    }

    /// Nearest neighbours of `vector`, with payload and vectors attached
    pub async fn search<T: Tagged>(
        &self,
        name: &str,
        vector: &[f32],
        options: SearchOptions,
    ) -> Result<Vec<T>, StoreError> {
        let schema = Schema::<T>::of()?;
        self.check_dimensions(vector)?;
        let url = format!("{}/collections/{name}/points/search", self.base_url);
        let body = json!({
            "vector": vector,
            "limit": options.limit,
            "with_payload": true,
            "with_vector": true,
        });
        let raw = self
            .send("search points", self.client.post(url).json(&body))
            .await?;
        let found: SearchResponse = serde_json::from_value(raw)?;
        let records: Vec<Record> = found
            .result
            .into_iter()
            .map(ScoredPoint::into_record)
            .collect();
        Ok(schema.decode_many(&records))
    }
}
