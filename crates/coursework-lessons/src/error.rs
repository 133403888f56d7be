use coursework_ai::AiError;
use coursework_core::ProtocolError;
use coursework_knowledge::KnowledgeError;
use coursework_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("unsupported lesson solver {0}")]
    UnsupportedLesson(String),

    #[error("failed to {stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<LessonError>,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("failed to read dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("ambiguous result: {0}")]
    AmbiguousResult(String),

    #[error("unsupported function {0}")]
    UnsupportedFunction(String),

    #[error("unexpected answer: {0}")]
    UnexpectedAnswer(String),
}

impl LessonError {
    /// The innermost error, below every stage wrapper
    pub fn root(&self) -> &LessonError {
        match self {
            LessonError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach the failing stage to an error
pub trait Stage<T> {
    fn stage(self, stage: &'static str) -> Result<T, LessonError>;
}

impl<T, E: Into<LessonError>> Stage<T> for Result<T, E> {
    fn stage(self, stage: &'static str) -> Result<T, LessonError> {
        self.map_err(|e| LessonError::Stage {
            stage,
            source: Box::new(e.into()),
        })
    }
}
