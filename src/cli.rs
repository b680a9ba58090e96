use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Build(BuildArgs),
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Output directory for the generated site.
    #[arg(long)]
    pub out: String,

    /// Site configuration file (YAML).
    #[arg(long)]
    pub config: Option<String>,

    /// Published CSV of the story index (overrides the config file).
    #[arg(long)]
    pub index_url: Option<String>,

    /// Published CSV of affiliate links (overrides the config file).
    #[arg(long)]
    pub affiliates_url: Option<String>,

    /// Overwrite a previously generated site in `--out`.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Path to a generated `data/stories.json`.
    #[arg(long)]
    pub manifest: String,

    /// Search text; empty lists every story.
    #[arg(long, default_value = "")]
    pub query: String,
}
