//! Lesson registry and dispatch

use crate::error::LessonError;
use crate::lessons;
use crate::solver::{LessonContext, Solver};
use async_trait::async_trait;
use coursework_core::TaskClient;
use std::collections::HashMap;
use tracing::debug;

/// Builds a solver for one lesson
pub type SolverFactory = fn(&LessonContext) -> Box<dyn Solver>;

/// Lesson identifiers mapped to solver factories
pub struct LessonRegistry {
    factories: HashMap<String, SolverFactory>,
}

impl LessonRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every lesson this crate solves
    pub fn with_default_lessons() -> Self {
        let mut registry = Self::new();
        lessons::register_all(&mut registry);
        registry
    }

    /// Register a factory; an existing entry under `name` is replaced
    pub fn register(&mut self, name: impl Into<String>, factory: SolverFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            debug!(lesson = %name, "lesson factory replaced");
        }
    }

    /// Solver for `name`, or a solver that reports the lesson as unsupported
    pub fn dispatch(&self, name: &str, context: &LessonContext) -> Box<dyn Solver> {
        match self.factories.get(name) {
            Some(factory) => factory(context),
            None => Box::new(UnsupportedLessonSolver::new(name)),
        }
    }

    /// Registered lesson identifiers, sorted
    pub fn lessons(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for LessonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in returned for lessons nobody registered
pub struct UnsupportedLessonSolver {
    name: String,
}

impl UnsupportedLessonSolver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Solver for UnsupportedLessonSolver {
    async fn solve(&self, _server: &TaskClient) -> Result<(), LessonError> {
        Err(LessonError::UnsupportedLesson(self.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lessons_registered() {
        let registry = LessonRegistry::with_default_lessons();
        assert_eq!(registry.len(), 18);
        assert_eq!(
            registry.lessons(),
            vec![
                "1", "4a", "4b", "c01l05", "c02l02", "c02l03", "c02l04", "c02l05", "c03l01",
                "c03l02", "c03l03", "c03l04", "c03l05", "c04l01", "c04l02", "c04l03", "c04l04",
                "c04l05",
            ]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = LessonRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.contains("1"));
        assert!(registry.lessons().is_empty());
    }
}
