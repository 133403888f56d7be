use anyhow::Context;
use coursework_core::TaskClient;
use coursework_lessons::{LessonContext, LessonRegistry};
use tracing::info;

use crate::cli::Cli;

pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let lesson = cli.lesson.as_deref().context("--lesson is required")?;
    let settings = cli.settings();

    let registry = LessonRegistry::with_default_lessons();
    let server = TaskClient::from_settings(&settings);
    let context = LessonContext::new(settings);

    info!(lesson, "solving lesson");
    registry
        .dispatch(lesson, &context)
        .solve(&server)
        .await
        .with_context(|| format!("lesson {lesson} failed"))?;
    info!(lesson, "lesson solved");
    Ok(())
}
