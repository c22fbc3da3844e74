//! trialstat binary entry point

fn main() -> anyhow::Result<()> {
    trialstat_cli::run()
}
