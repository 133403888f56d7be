//! JSON document collections kept in SQLite tables

use crate::error::StoreError;
use rusqlite::{params, params_from_iter, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const ID_KEY: &str = "_id";

/// Exact-match conditions, all of which must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn collection_names(conn: &Connection) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Lists every collection and checks membership
    pub fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let names = Self::collection_names(&self.conn())?;
        Ok(names.iter().any(|n| n == name))
    }

    /// Fails if the collection already exists
    pub fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        let table = table_name(name)?;
        self.conn().execute(
            &format!("CREATE TABLE {table} (id TEXT PRIMARY KEY, body TEXT NOT NULL)"),
            [],
        )?;
        info!(collection = name, "collection created");
        Ok(())
    }

    /// Bulk insert in one transaction; documents without `_id` get a fresh UUID
    pub fn insert_many<T: Serialize>(&self, name: &str, items: &[T]) -> Result<usize, StoreError> {
        let table = table_name(name)?;
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            &format!("CREATE TABLE IF NOT EXISTS {table} (id TEXT PRIMARY KEY, body TEXT NOT NULL)"),
            [],
        )?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {table} (id, body) VALUES (?1, ?2)"))?;
            for item in items {
                let (id, body) = into_document(item)?;
                stmt.execute(params![id, body])?;
            }
        }
        tx.commit()?;
        debug!(collection = name, count = items.len(), "documents inserted");
        Ok(items.len())
    }

    /// Every document whose fields equal all filter values; a missing collection is empty
    pub fn find<T: DeserializeOwned>(&self, name: &str, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let table = table_name(name)?;
        let conn = self.conn();
        if !Self::collection_names(&conn)?.iter().any(|n| n == name) {
            return Ok(Vec::new());
        }

        let mut sql = format!("SELECT body FROM {table}");
        let mut args = Vec::with_capacity(filter.conditions.len() * 2);
        for (i, (key, value)) in filter.conditions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("json_extract(body, ?{}) = ?{}", 2 * i + 1, 2 * i + 2));
            args.push(format!("$.\"{}\"", key.replace('"', "")));
            args.push(value.clone());
        }
        sql.push_str(" ORDER BY rowid");

        let mut stmt = conn.prepare(&sql)?;
        let bodies = stmt
            .query_map(params_from_iter(args.iter()), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut documents = Vec::with_capacity(bodies.len());
        for body in bodies {
            documents.push(serde_json::from_str(&body)?);
        }
        Ok(documents)
    }
}

fn into_document<T: Serialize>(item: &T) -> Result<(String, String), StoreError> {
    let mut value = serde_json::to_value(item)?;
    let id = match value.get(ID_KEY) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    if let Value::Object(map) = &mut value {
        map.insert(ID_KEY.to_string(), Value::String(id.clone()));
    }
    Ok((id, value.to_string()))
}

/// Quoted table identifier; names are limited to ASCII letters, digits and `_`
fn table_name(name: &str) -> Result<String, StoreError> {
    let valid = !name.is_empty()
        && !name.starts_with("sqlite_")
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidCollectionName(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}
