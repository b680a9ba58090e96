use std::path::Path;

use anyhow::Context as _;
use chrono::Datelike as _;
use serde::{Deserialize, Serialize};

use crate::client::gate::COUNTDOWN_TICKS;

/// Build configuration: source tables, page settings, and UI copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub sources: SourcesConfig,
    pub site: SiteSettings,
    pub copy: CopyText,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub index_url: Option<String>,
    pub affiliates_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Value of the `<html lang>` attribute.
    pub lang: String,
    pub countdown_seconds: u32,
    pub copyright_year: Option<i32>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            lang: "en".to_owned(),
            countdown_seconds: COUNTDOWN_TICKS,
            copyright_year: None,
        }
    }
}

impl SiteSettings {
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds.max(1)
    }

    pub fn copyright_year(&self) -> i32 {
        self.copyright_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}

/// User-facing strings. `countdown` may contain `{seconds}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyText {
    pub site_title: String,
    pub tagline: String,
    pub home_heading: String,
    pub read_story: String,
    pub no_stories: String,
    pub stories_failed: String,
    pub search_placeholder: String,
    pub search_button: String,
    pub no_matches: String,
    pub story_from: String,
    pub previous_chapter: String,
    pub next_chapter: String,
    pub back_to_stories: String,
    pub chapter_picker: String,
    pub unlock_prompt: String,
    pub unlock_button: String,
    pub countdown: String,
    pub banner_intro: String,
    pub banner_cta: String,
    pub banner_failed: String,
    pub story_not_found: String,
    pub chapter_not_found: String,
    pub footer_owner: String,
}

impl Default for CopyText {
    fn default() -> Self {
        Self {
            site_title: "Dual Language Stories - Learn with Reading".to_owned(),
            tagline: "Read engaging stories side-by-side in two languages to boost your learning."
                .to_owned(),
            home_heading: "Welcome to Dual Language Stories!".to_owned(),
            read_story: "Read Story".to_owned(),
            no_stories: "No stories available yet. Please check back later!".to_owned(),
            stories_failed: "Failed to load stories. Please try again later.".to_owned(),
            search_placeholder: "Search stories or chapters...".to_owned(),
            search_button: "Search".to_owned(),
            no_matches: "No stories match your search.".to_owned(),
            story_from: "From:".to_owned(),
            previous_chapter: "\u{ab} Previous Chapter".to_owned(),
            next_chapter: "Next Chapter \u{bb}".to_owned(),
            back_to_stories: "Back to Stories".to_owned(),
            chapter_picker: "Jump to chapter".to_owned(),
            unlock_prompt:
                "To unlock this chapter and support our work, please visit one of our partners:"
                    .to_owned(),
            unlock_button: "Unlock Chapter by Visiting a Partner".to_owned(),
            countdown: "Unlocking in {seconds}s...".to_owned(),
            banner_intro: "Check out our partner:".to_owned(),
            banner_cta: "Visit Now!".to_owned(),
            banner_failed: "Advertisement loading failed. Please try again later.".to_owned(),
            story_not_found: "Story Not Found".to_owned(),
            chapter_not_found: "Chapter Not Found".to_owned(),
            footer_owner: "Dual Language Stories".to_owned(),
        }
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        serde_yaml::from_str(&yaml).with_context(|| format!("parse config: {}", path.display()))
    }

    /// Fills source locations from the command line, which wins over the file.
    pub fn with_sources(
        mut self,
        index_url: Option<String>,
        affiliates_url: Option<String>,
    ) -> Self {
        if index_url.is_some() {
            self.sources.index_url = index_url;
        }
        if affiliates_url.is_some() {
            self.sources.affiliates_url = affiliates_url;
        }
        self
    }
}
