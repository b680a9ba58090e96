use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    dualstories::logging::init().context("init logging")?;

    let cli = dualstories::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        dualstories::cli::Command::Build(args) => {
            dualstories::build::run(args).await.context("build")?;
        }
        dualstories::cli::Command::Search(args) => {
            dualstories::search::run(args).context("search")?;
        }
    }

    Ok(())
}
