//! Lesson c02l04: transcription of the audio file linked in the task message

use crate::error::{LessonError, Stage};
use crate::solver::{after_phrase, submit, LessonContext, Solver};
use async_trait::async_trait;
use coursework_ai::{Assistant, AudioFile};
use coursework_core::{NoInput, Task, TaskClient};
use tracing::info;

pub const KEY: &str = "c02l04";
pub const TASK: &str = "whisper";

const PHRASE: &str = "please return transcription of this file: ";

pub struct Whisper {
    assistant: Assistant,
}

pub fn factory(context: &LessonContext) -> Box<dyn Solver> {
    Box::new(Whisper {
        assistant: context.assistant(),
    })
}

#[async_trait]
impl Solver for Whisper {
    async fn solve(&self, server: &TaskClient) -> Result<(), LessonError> {
        let task: Task<NoInput> = server.fetch(TASK).await.stage("fetch task")?;
        let url = after_phrase(&task.msg, PHRASE).trim();
        let audio = AudioFile::download(url).await.stage("download audio")?;
        info!(file = %audio.file_name, "transcribing");
        let text = self
            .assistant
            .transcribe(audio)
            .await
            .stage("find solution")?;
        submit(server, &task.token, &text).await
    }
}
