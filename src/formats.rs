use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One record of a source table: column name to trimmed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line in the source sheet; the header is line 1.
    pub line: u64,
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Like [`Row::get`] but treats an empty cell as absent.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryIndexEntry {
    pub line: u64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: String,
    pub content_source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphRow {
    pub line: u64,
    pub chapter_slug: String,
    pub chapter_title: String,
    pub paragraph_lang1: String,
    pub paragraph_lang2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateLink {
    pub product_name: String,
    pub link_url: String,
    pub image_url: String,
    pub alt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub lang1: String,
    pub lang2: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub slug: String,
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: String,
    pub chapters: Vec<Chapter>,
}

/// Manifest entry consumed by the browser runtime (`data/stories.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStory {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: String,
    pub chapters: Vec<ManifestChapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestChapter {
    pub slug: String,
    pub title: String,
}

impl From<&Story> for ManifestStory {
    fn from(story: &Story) -> Self {
        Self {
            slug: story.slug.clone(),
            title: story.title.clone(),
            description: story.description.clone(),
            cover_image_url: story.cover_image_url.clone(),
            chapters: story
                .chapters
                .iter()
                .map(|chapter| ManifestChapter {
                    slug: chapter.slug.clone(),
                    title: chapter.title.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub slug: String,
    pub title: String,
}

/// Everything needed to render one chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPage {
    pub story_slug: String,
    pub story_title: String,
    pub chapter_slug: String,
    pub chapter_title: String,
    pub paragraphs: Vec<Paragraph>,
    pub prev: Option<ChapterLink>,
    pub next: Option<ChapterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: String,
    pub first_chapter_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub stories: Vec<StoryCard>,
}
