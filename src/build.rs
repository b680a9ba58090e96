use std::path::Path;

use anyhow::Context as _;

use crate::aggregate;
use crate::cli::BuildArgs;
use crate::config::SiteConfig;
use crate::emit::{self, SiteOutput};
use crate::error::StoryIngestionError;
use crate::formats::{Story, StoryIndexEntry};
use crate::render::{self, SiteRenderer};
use crate::site_store::{LocalFsSiteStore, SiteStore};
use crate::source::{HttpTableSource, TableSource};

pub async fn run(args: BuildArgs) -> anyhow::Result<()> {
    let config = match args.config.as_deref() {
        Some(path) => SiteConfig::load(Path::new(path)).context("load config")?,
        None => SiteConfig::default(),
    }
    .with_sources(args.index_url.clone(), args.affiliates_url.clone());

    let index_url = config.sources.index_url.clone().ok_or_else(|| {
        anyhow::anyhow!("story index url is not configured (--index-url or sources.index_url)")
    })?;
    let affiliates_url = config.sources.affiliates_url.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "affiliate table url is not configured (--affiliates-url or sources.affiliates_url)"
        )
    })?;
    crate::source::validate_table_url(&index_url).context("story index url")?;
    crate::source::validate_table_url(&affiliates_url).context("affiliate table url")?;

    let store = LocalFsSiteStore::new(&args.out);
    if !args.force && store.exists(&emit::manifest_path()).await? {
        anyhow::bail!(
            "site output already exists: {} (pass --force to overwrite)",
            store.base_dir().display()
        );
    }

    let source = HttpTableSource::new()?;
    let site = generate(&source, &index_url, &affiliates_url).await?;

    tracing::info!(out = %store.base_dir().display(), "build: write site");
    write_site(&store, &config, &site).await?;

    tracing::info!(
        stories = site.manifest.len(),
        chapters = site.chapter_pages.len(),
        affiliates = site.affiliates.len(),
        "build: done"
    );
    Ok(())
}

/// Fetches every table and turns it into page data.
///
/// The affiliate table and the story index are required; a story whose
/// content cannot be ingested is logged and left out.
pub async fn generate(
    source: &dyn TableSource,
    index_url: &str,
    affiliates_url: &str,
) -> anyhow::Result<SiteOutput> {
    tracing::info!(url = %affiliates_url, "build: affiliates");
    let affiliate_rows = source
        .fetch_table(affiliates_url)
        .await
        .context("fetch affiliate table")?;
    let affiliates = aggregate::affiliates(&affiliate_rows);
    if affiliates.is_empty() {
        tracing::warn!("affiliate table is empty; gates will unlock without a partner link");
    }

    tracing::info!(url = %index_url, "build: story index");
    let index_rows = source
        .fetch_table(index_url)
        .await
        .context("fetch story index")?;
    let entries = aggregate::story_index(&index_rows);
    if entries.is_empty() {
        tracing::warn!("no stories found in the index; the site will be empty");
    }

    let mut stories = Vec::with_capacity(entries.len());
    for entry in &entries {
        match ingest_story(source, entry).await {
            Ok(story) => {
                tracing::info!(
                    story = %story.slug,
                    chapters = story.chapters.len(),
                    "build: story ingested"
                );
                stories.push(story);
            }
            Err(err) => {
                let slug = err.slug().to_owned();
                let err = anyhow::Error::new(err);
                tracing::warn!(story = %slug, "skipping story: {err:#}");
            }
        }
    }

    Ok(emit::emit(&stories, &affiliates))
}

async fn ingest_story(
    source: &dyn TableSource,
    entry: &StoryIndexEntry,
) -> Result<Story, StoryIngestionError> {
    let url = entry
        .content_source_url
        .as_deref()
        .ok_or_else(|| StoryIngestionError::MissingContentUrl {
            slug: entry.slug.clone(),
        })?;
    let rows = source
        .fetch_table(url)
        .await
        .map_err(|source| StoryIngestionError::Source {
            slug: entry.slug.clone(),
            source,
        })?;
    aggregate::build_story(entry, &rows)
}

pub async fn write_site(
    store: &dyn SiteStore,
    config: &SiteConfig,
    site: &SiteOutput,
) -> anyhow::Result<()> {
    let manifest_json =
        serde_json::to_string_pretty(&site.manifest).context("serialize manifest")?;
    store
        .write_text(&emit::manifest_path(), &manifest_json)
        .await
        .context("write manifest")?;

    let affiliates_json =
        serde_json::to_string_pretty(&site.affiliates).context("serialize affiliates")?;
    store
        .write_text(&emit::affiliates_path(), &affiliates_json)
        .await
        .context("write affiliates")?;

    store
        .write_text(render::SCRIPT_PATH, render::SCRIPT)
        .await
        .context("write script")?;
    store
        .write_text(render::STYLES_PATH, render::STYLES)
        .await
        .context("write stylesheet")?;

    let renderer = SiteRenderer::new(config);
    for page in &site.chapter_pages {
        let html = renderer
            .render_chapter(page)
            .with_context(|| format!("render chapter: {}/{}", page.story_slug, page.chapter_slug))?;
        let path = emit::chapter_page_path(&page.story_slug, &page.chapter_slug);
        store
            .write_text(&path, &html)
            .await
            .with_context(|| format!("write chapter: {path}"))?;
    }

    let home = renderer.render_home(&site.home).context("render home page")?;
    store
        .write_text(emit::HOME_FILE, &home)
        .await
        .context("write home page")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::SourceError;
    use crate::formats::{ManifestStory, Row};
    use crate::source::parse_table;

    /// Serves CSV bodies by URL; unknown URLs answer 404.
    struct StaticTableSource {
        tables: HashMap<String, String>,
    }

    impl StaticTableSource {
        fn new(tables: &[(&str, &str)]) -> Self {
            Self {
                tables: tables
                    .iter()
                    .map(|(url, csv)| ((*url).to_owned(), (*csv).to_owned()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl TableSource for StaticTableSource {
        async fn fetch_table(&self, url: &str) -> Result<Vec<Row>, SourceError> {
            match self.tables.get(url) {
                Some(csv) => parse_table(url, csv.as_bytes()),
                None => Err(SourceError::HttpStatus {
                    url: url.to_owned(),
                    status: reqwest::StatusCode::NOT_FOUND,
                }),
            }
        }
    }

    const INDEX: &str = "https://sheets.test/index.csv";
    const AFFILIATES: &str = "https://sheets.test/affiliates.csv";

    const AFFILIATES_CSV: &str = "product_name,link_url,image_url,alt_text\n\
        Dictionary,https://shop.test/dict,https://shop.test/dict.png,A dictionary\n";

    fn index_csv(rows: &[&str]) -> String {
        let mut csv = "slug,title,description,cover_image_url,content_source_url\n".to_owned();
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }

    const PRINCE_CSV: &str = "chapter_slug,chapter_title,paragraph_lang1,paragraph_lang2\n\
        chapter-2,El sombrero,Dibujo número dos,Drawing number two\n\
        chapter-1,El piloto,Cuando tenía seis años,When I was six\n\
        chapter-1,El piloto,Vi una lámina,I saw a picture\n";

    const EMPTY_CSV: &str = "chapter_slug,chapter_title,paragraph_lang1,paragraph_lang2\n\
        ,,,\n\
        chapter-1,,sin título,untitled\n";

    fn chapter_slugs(story: &ManifestStory) -> Vec<&str> {
        story.chapters.iter().map(|c| c.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn stories_without_valid_rows_are_left_out() -> anyhow::Result<()> {
        let index = index_csv(&[
            "prince,The Little Prince,A pilot,,https://sheets.test/prince.csv",
            "empty,Empty Story,Nothing,,https://sheets.test/empty.csv",
        ]);
        let source = StaticTableSource::new(&[
            (INDEX, index.as_str()),
            (AFFILIATES, AFFILIATES_CSV),
            ("https://sheets.test/prince.csv", PRINCE_CSV),
            ("https://sheets.test/empty.csv", EMPTY_CSV),
        ]);

        let site = generate(&source, INDEX, AFFILIATES).await?;

        assert_eq!(site.manifest.len(), 1);
        assert_eq!(site.manifest[0].slug, "prince");
        assert_eq!(chapter_slugs(&site.manifest[0]), vec!["chapter-1", "chapter-2"]);
        assert_eq!(site.chapter_pages.len(), 2);
        assert_eq!(site.chapter_pages[0].paragraphs.len(), 2);
        assert_eq!(site.affiliates.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_or_missing_story_content_does_not_abort() -> anyhow::Result<()> {
        let index = index_csv(&[
            "gone,Gone,404 content,,https://sheets.test/gone.csv",
            "nourl,No Url,no content column,,",
            "prince,The Little Prince,A pilot,,https://sheets.test/prince.csv",
        ]);
        let source = StaticTableSource::new(&[
            (INDEX, index.as_str()),
            (AFFILIATES, AFFILIATES_CSV),
            ("https://sheets.test/prince.csv", PRINCE_CSV),
        ]);

        let site = generate(&source, INDEX, AFFILIATES).await?;
        let slugs: Vec<_> = site.manifest.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["prince"]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_index_table_is_fatal() {
        let source = StaticTableSource::new(&[(AFFILIATES, AFFILIATES_CSV)]);
        let err = generate(&source, INDEX, AFFILIATES).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("fetch story index"));
        assert!(message.contains(INDEX));
        assert!(
            err.chain()
                .filter_map(|cause| cause.downcast_ref::<SourceError>())
                .any(SourceError::is_fetch)
        );
    }

    #[tokio::test]
    async fn missing_affiliate_table_is_fatal() {
        let index = index_csv(&[]);
        let source = StaticTableSource::new(&[(INDEX, index.as_str())]);
        let err = generate(&source, INDEX, AFFILIATES).await.unwrap_err();
        assert!(format!("{err:#}").contains("fetch affiliate table"));
    }

    #[tokio::test]
    async fn empty_affiliate_table_still_builds() -> anyhow::Result<()> {
        let index = index_csv(&["prince,The Little Prince,A pilot,,https://sheets.test/prince.csv"]);
        let source = StaticTableSource::new(&[
            (INDEX, index.as_str()),
            (AFFILIATES, "product_name,link_url,image_url,alt_text\n"),
            ("https://sheets.test/prince.csv", PRINCE_CSV),
        ]);

        let site = generate(&source, INDEX, AFFILIATES).await?;
        assert!(site.affiliates.is_empty());
        assert_eq!(site.manifest.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn write_site_lays_out_pages_data_and_assets() -> anyhow::Result<()> {
        let index = index_csv(&["prince,The Little Prince,A pilot,,https://sheets.test/prince.csv"]);
        let source = StaticTableSource::new(&[
            (INDEX, index.as_str()),
            (AFFILIATES, AFFILIATES_CSV),
            ("https://sheets.test/prince.csv", PRINCE_CSV),
        ]);
        let site = generate(&source, INDEX, AFFILIATES).await?;

        let temp = tempfile::TempDir::new()?;
        let store = LocalFsSiteStore::new(temp.path());
        write_site(&store, &SiteConfig::default(), &site).await?;

        for path in [
            "index.html",
            "data/stories.json",
            "data/affiliates.json",
            "assets/js/main.js",
            "assets/css/styles.css",
            "story/prince/chapter-1.html",
            "story/prince/chapter-2.html",
        ] {
            assert!(temp.path().join(path).exists(), "expected {path}");
        }

        let manifest: Vec<ManifestStory> = serde_json::from_str(&std::fs::read_to_string(
            temp.path().join("data/stories.json"),
        )?)?;
        assert_eq!(manifest, site.manifest);
        Ok(())
    }
}
