use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::SearchArgs;
use crate::client::{RenderContext, SearchOutcome};
use crate::formats::ManifestStory;

/// Prints what the home-page search shows for a query against a built site.
pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let manifest_path = PathBuf::from(&args.manifest);
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("read manifest: {}", manifest_path.display()))?;
    let manifest: Vec<ManifestStory> = serde_json::from_str(&json)
        .with_context(|| format!("parse manifest: {}", manifest_path.display()))?;

    let ctx = RenderContext::new(&manifest);
    let SearchOutcome::Results(found) = ctx.search(&args.query) else {
        anyhow::bail!("search is unavailable without a manifest");
    };
    tracing::debug!(query = %args.query, matches = found.len(), "search");

    let mut stdout = std::io::stdout().lock();
    for story in found {
        writeln!(stdout, "{}\t{}", story.slug, story.title).context("write search result")?;
    }
    stdout.flush().context("flush search results")?;
    Ok(())
}
