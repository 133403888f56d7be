use coursework_lessons::LessonRegistry;

pub fn run() -> anyhow::Result<()> {
    for lesson in LessonRegistry::with_default_lessons().lessons() {
        println!("{lesson}");
    }
    Ok(())
}
