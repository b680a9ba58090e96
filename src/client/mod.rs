//! Behaviour of the per-page browser runtime (`assets/main.js`).

pub mod gate;
pub mod nav;
pub mod search;

use crate::formats::ManifestStory;

pub use gate::{GateEffect, GateMachine, GateState};
pub use nav::{ChapterNavigation, NavError, PageLocation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'m> {
    /// No manifest was loaded; the search controls stay inert.
    Disabled,
    Results(Vec<&'m ManifestStory>),
}

/// State shared by search, card listing, and navigation for one page view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'m> {
    manifest: Option<&'m [ManifestStory]>,
}

impl<'m> RenderContext<'m> {
    pub fn new(manifest: &'m [ManifestStory]) -> Self {
        Self {
            manifest: Some(manifest),
        }
    }

    /// Context for a page whose manifest failed to load.
    pub fn unavailable() -> Self {
        Self { manifest: None }
    }

    /// Stories to show as home cards for `query`, newest first.
    pub fn search(&self, query: &str) -> SearchOutcome<'m> {
        let Some(manifest) = self.manifest else {
            return SearchOutcome::Disabled;
        };
        let mut found = search::filter(manifest, query);
        found.reverse();
        SearchOutcome::Results(found)
    }

    pub fn navigation(
        &self,
        location: &PageLocation,
    ) -> Option<Result<ChapterNavigation, NavError>> {
        let PageLocation::Chapter {
            story_slug,
            chapter_slug,
        } = location
        else {
            return None;
        };
        let manifest = self.manifest?;
        Some(ChapterNavigation::resolve(manifest, story_slug, chapter_slug))
    }
}
