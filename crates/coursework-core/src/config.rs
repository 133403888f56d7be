//! Endpoints and limits shared by every lesson run

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Wall-clock limit for a single task protocol call
pub const TASK_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings
#[derive(Clone)]
pub struct Settings {
    /// Base URL of the grading service
    pub aidevs_url: String,

    /// API key for the grading service
    pub aidevs_key: String,

    /// Base URL of the AI service
    pub openai_url: String,

    /// API key for the AI service
    pub openai_key: String,

    /// Base URL of the vector database (HTTP API)
    pub qdrant_url: String,

    /// SQLite file backing the document store
    pub documents_db: PathBuf,

    /// Directory holding lesson datasets
    pub data_dir: PathBuf,

    /// Timeout for task protocol calls
    pub task_timeout: Duration,
}

impl Settings {
    pub fn new() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            aidevs_url: "https://zadania.aidevs.pl".to_string(),
            aidevs_key: String::new(),
            openai_url: "https://api.openai.com".to_string(),
            openai_key: String::new(),
            qdrant_url: "http://localhost:6333".to_string(),
            documents_db: data_dir.join("coursework.db"),
            data_dir,
            task_timeout: TASK_TIMEOUT,
        }
    }

    /// Path of a dataset file for the given lesson
    pub fn dataset(&self, lesson: &str, file: &str) -> PathBuf {
        self.data_dir.join(lesson).join(file)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("aidevs_url", &self.aidevs_url)
            .field("aidevs_key", &redacted(&self.aidevs_key))
            .field("openai_url", &self.openai_url)
            .field("openai_key", &redacted(&self.openai_key))
            .field("qdrant_url", &self.qdrant_url)
            .field("documents_db", &self.documents_db)
            .field("data_dir", &self.data_dir)
            .field("task_timeout", &self.task_timeout)
            .finish()
    }
}

fn redacted(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
