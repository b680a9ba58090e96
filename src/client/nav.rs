use thiserror::Error;
use url::Url;

use crate::emit::{HOME_FILE, STORY_DIR, sibling_chapter_href};
use crate::formats::ManifestStory;

/// What a page address points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation {
    Home,
    Chapter {
        story_slug: String,
        chapter_slug: String,
    },
    Other,
}

impl PageLocation {
    /// Reads `…/story/<story>/<chapter>.html` or a home address from a full
    /// page URL. Sites may live under a path prefix.
    pub fn parse(page_url: &str) -> Self {
        let Ok(url) = Url::parse(page_url) else {
            return Self::Other;
        };
        let Some(segments) = url.path_segments() else {
            return Self::Other;
        };
        let segments: Vec<&str> = segments.collect();

        match segments.as_slice() {
            [.., dir, story, file] if *dir == STORY_DIR => match file.strip_suffix(".html") {
                Some(chapter) if !chapter.is_empty() && !story.is_empty() => Self::Chapter {
                    story_slug: (*story).to_owned(),
                    chapter_slug: chapter.to_owned(),
                },
                _ => Self::Other,
            },
            [.., last] if last.is_empty() || *last == HOME_FILE => Self::Home,
            [] => Self::Home,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("story not found")]
    StoryNotFound,
    #[error("chapter not found")]
    ChapterNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub slug: String,
    pub title: String,
    pub href: String,
}

/// Navigation for one chapter page, derived from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterNavigation {
    pub story_title: String,
    pub chapter_title: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub picker: Vec<PickerOption>,
    pub selected: usize,
}

impl ChapterNavigation {
    pub fn resolve(
        manifest: &[ManifestStory],
        story_slug: &str,
        chapter_slug: &str,
    ) -> Result<Self, NavError> {
        let story = manifest
            .iter()
            .find(|story| story.slug == story_slug)
            .ok_or(NavError::StoryNotFound)?;
        let selected = story
            .chapters
            .iter()
            .position(|chapter| chapter.slug == chapter_slug)
            .ok_or(NavError::ChapterNotFound)?;

        let href = |idx: usize| {
            story
                .chapters
                .get(idx)
                .map(|chapter| sibling_chapter_href(&chapter.slug))
        };

        Ok(Self {
            story_title: story.title.clone(),
            chapter_title: story.chapters[selected].title.clone(),
            prev_href: selected.checked_sub(1).and_then(href),
            next_href: href(selected + 1),
            picker: story
                .chapters
                .iter()
                .map(|chapter| PickerOption {
                    slug: chapter.slug.clone(),
                    title: chapter.title.clone(),
                    href: sibling_chapter_href(&chapter.slug),
                })
                .collect(),
            selected,
        })
    }
}
