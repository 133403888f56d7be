use clap::Parser;
use coursework_core::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coursework")]
#[command(version)]
#[command(about = "Solve coursework lessons against the grading service")]
pub struct Cli {
    /// API key for the AI service
    #[arg(long, required_unless_present = "list")]
    pub openai_key: Option<String>,

    /// API key for the grading service
    #[arg(long, required_unless_present = "list")]
    pub aidevs_key: Option<String>,

    /// Lesson to solve, e.g. c03l05
    #[arg(long, required_unless_present = "list")]
    pub lesson: Option<String>,

    /// Grading service base URL
    #[arg(long)]
    pub aidevs_url: Option<String>,

    /// AI service base URL
    #[arg(long)]
    pub openai_url: Option<String>,

    /// Vector database base URL
    #[arg(long)]
    pub qdrant_url: Option<String>,

    /// SQLite file for the document store
    #[arg(long)]
    pub documents_db: Option<PathBuf>,

    /// Directory with lesson datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// List registered lessons and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Defaults overridden by whatever was given on the command line
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::new();
        if let Some(key) = &self.openai_key {
            settings.openai_key = key.clone();
        }
        if let Some(key) = &self.aidevs_key {
            settings.aidevs_key = key.clone();
        }
        if let Some(url) = &self.aidevs_url {
            settings.aidevs_url = url.clone();
        }
        if let Some(url) = &self.openai_url {
            settings.openai_url = url.clone();
        }
        if let Some(url) = &self.qdrant_url {
            settings.qdrant_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            settings.documents_db = dir.join("coursework.db");
            settings.data_dir = dir.clone();
        }
        if let Some(path) = &self.documents_db {
            settings.documents_db = path.clone();
        }
        settings
    }
}
