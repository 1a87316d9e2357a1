fn main() -> anyhow::Result<()> {
    learner_progress::run()
}
