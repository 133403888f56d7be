//! One module per lesson: its task payload, its solution and its factory

pub mod blogger;
pub mod embedding;
pub mod functions;
pub mod gnome;
pub mod helloapi;
pub mod inprompt;
pub mod knowledge;
pub mod liar;
pub mod moderation;
pub mod ownapi;
pub mod people;
pub mod rodo;
pub mod scraper;
pub mod search;
pub mod tools;
pub mod whisper;
pub mod whoami;

use crate::registry::LessonRegistry;

/// Rules shared by the context-grounded chat prompts
pub(crate) const CONTEXT_RULES: &str = r#"
Strict rules of this conversation:
- I'm strictly forbidden to use any knowledge outside the context below and I always refuse to answer such question mentioning this rule.
- Because of your expertise, I'll always skip any comments entirely
- I keep my answers ultra-concise
- I'm always truthful and honestly say "I don't know" when you ask me about something beyond my current knowledge
- I'm aware only I have access to the context right now
"#;

pub fn register_all(registry: &mut LessonRegistry) {
    registry.register(helloapi::KEY, helloapi::factory);
    registry.register(moderation::KEY, moderation::factory);
    registry.register(blogger::KEY, blogger::factory);
    registry.register(liar::KEY, liar::factory);
    registry.register(inprompt::KEY, inprompt::factory);
    registry.register(embedding::KEY, embedding::factory);
    registry.register(whisper::KEY, whisper::factory);
    registry.register(functions::KEY, functions::factory);
    registry.register(rodo::KEY, rodo::factory);
    registry.register(scraper::KEY, scraper::factory);
    registry.register(whoami::KEY, whoami::factory);
    registry.register(search::KEY, search::factory);
    registry.register(people::KEY, people::factory);
    registry.register(knowledge::KEY, knowledge::factory);
    registry.register(tools::KEY, tools::factory);
    registry.register(gnome::KEY, gnome::factory);
    registry.register(ownapi::KEY, ownapi::factory);
    registry.register(ownapi::PRO_KEY, ownapi::pro_factory);
}

/// Fenced context block appended to a system prompt
pub(crate) fn fenced_context(context: &str) -> String {
    format!("\nContext```{context}```")
}
