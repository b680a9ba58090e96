use crate::formats::ManifestStory;

/// Case-insensitive substring match on story title, description, or any
/// chapter title. A blank query keeps every story; input order is kept.
pub fn filter<'m>(stories: &'m [ManifestStory], query: &str) -> Vec<&'m ManifestStory> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return stories.iter().collect();
    }
    stories
        .iter()
        .filter(|story| matches(story, &needle))
        .collect()
}

fn matches(story: &ManifestStory, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);
    contains(&story.title)
        || contains(&story.description)
        || story.chapters.iter().any(|chapter| contains(&chapter.title))
}
