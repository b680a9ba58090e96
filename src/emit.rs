use crate::formats::{
    AffiliateLink, ChapterLink, ChapterPage, HomePage, ManifestStory, Story, StoryCard,
};

pub const DATA_DIR: &str = "data";
pub const STORY_DIR: &str = "story";
pub const MANIFEST_FILE: &str = "stories.json";
pub const AFFILIATES_FILE: &str = "affiliates.json";
pub const HOME_FILE: &str = "index.html";

/// Page data for a whole site, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutput {
    pub manifest: Vec<ManifestStory>,
    pub affiliates: Vec<AffiliateLink>,
    pub home: HomePage,
    pub chapter_pages: Vec<ChapterPage>,
}

pub fn manifest_path() -> String {
    format!("{DATA_DIR}/{MANIFEST_FILE}")
}

pub fn affiliates_path() -> String {
    format!("{DATA_DIR}/{AFFILIATES_FILE}")
}

/// Site-relative path of a chapter page.
pub fn chapter_page_path(story_slug: &str, chapter_slug: &str) -> String {
    format!("{STORY_DIR}/{story_slug}/{chapter_slug}.html")
}

/// Link from one chapter page to a sibling in the same story.
pub fn sibling_chapter_href(chapter_slug: &str) -> String {
    format!("./{chapter_slug}.html")
}

pub fn emit(stories: &[Story], affiliates: &[AffiliateLink]) -> SiteOutput {
    let manifest = stories.iter().map(ManifestStory::from).collect();

    let mut chapter_pages = Vec::new();
    for story in stories {
        for (idx, chapter) in story.chapters.iter().enumerate() {
            let link = |i: usize| {
                story.chapters.get(i).map(|c| ChapterLink {
                    slug: c.slug.clone(),
                    title: c.title.clone(),
                })
            };
            chapter_pages.push(ChapterPage {
                story_slug: story.slug.clone(),
                story_title: story.title.clone(),
                chapter_slug: chapter.slug.clone(),
                chapter_title: chapter.title.clone(),
                paragraphs: chapter.paragraphs.clone(),
                prev: idx.checked_sub(1).and_then(link),
                next: link(idx + 1),
            });
        }
    }

    SiteOutput {
        manifest,
        affiliates: affiliates.to_vec(),
        home: home_page(stories),
        chapter_pages,
    }
}

/// Newest-authored story first: the reverse of index order.
fn home_page(stories: &[Story]) -> HomePage {
    let stories = stories
        .iter()
        .rev()
        .map(|story| StoryCard {
            slug: story.slug.clone(),
            title: story.title.clone(),
            description: story.description.clone(),
            cover_image_url: story.cover_image_url.clone(),
            first_chapter_slug: story.chapters.first().map(|c| c.slug.clone()),
        })
        .collect();
    HomePage { stories }
}
