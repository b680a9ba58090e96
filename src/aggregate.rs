use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{StoryIngestionError, ValidationError};
use crate::formats::{
    AffiliateLink, Chapter, Paragraph, ParagraphRow, Row, Story, StoryIndexEntry,
};

const CHAPTER_PREFIX: &str = "chapter-";
/// Width of `u64::MAX` in decimal.
const CHAPTER_NUMBER_WIDTH: usize = 20;

pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub fn story_index_entry_from_row(row: &Row) -> Result<StoryIndexEntry, ValidationError> {
    let slug = required(row, "slug")?;
    if !is_url_safe_slug(slug) {
        return Err(ValidationError::InvalidSlug {
            line: row.line,
            slug: slug.to_owned(),
        });
    }
    let title = required(row, "title")?;

    let content_source_url = row
        .non_empty("content_source_url")
        .or_else(|| row.non_empty("content_csv_url"))
        .map(str::to_owned);

    Ok(StoryIndexEntry {
        line: row.line,
        slug: slug.to_owned(),
        title: title.to_owned(),
        description: row.get("description").unwrap_or_default().to_owned(),
        cover_image_url: row.get("cover_image_url").unwrap_or_default().to_owned(),
        content_source_url,
    })
}

pub fn paragraph_row_from_row(row: &Row) -> Result<ParagraphRow, ValidationError> {
    let chapter_slug = required(row, "chapter_slug")?;
    if !is_url_safe_slug(chapter_slug) {
        return Err(ValidationError::InvalidSlug {
            line: row.line,
            slug: chapter_slug.to_owned(),
        });
    }
    let chapter_title = required(row, "chapter_title")?;
    let lang1 = present(row, "paragraph_lang1")?;
    let lang2 = present(row, "paragraph_lang2")?;
    if lang1.is_empty() && lang2.is_empty() {
        return Err(ValidationError::MissingField {
            line: row.line,
            field: "paragraph_lang1",
        });
    }

    Ok(ParagraphRow {
        line: row.line,
        chapter_slug: chapter_slug.to_owned(),
        chapter_title: chapter_title.to_owned(),
        paragraph_lang1: lang1.to_owned(),
        paragraph_lang2: lang2.to_owned(),
    })
}

pub fn affiliate_from_row(row: &Row) -> Result<AffiliateLink, ValidationError> {
    let link_url = required(row, "link_url")?;
    Ok(AffiliateLink {
        product_name: row.get("product_name").unwrap_or_default().to_owned(),
        link_url: link_url.to_owned(),
        image_url: row.get("image_url").unwrap_or_default().to_owned(),
        alt_text: row.get("alt_text").unwrap_or_default().to_owned(),
    })
}

fn required<'r>(row: &'r Row, field: &'static str) -> Result<&'r str, ValidationError> {
    row.non_empty(field).ok_or(ValidationError::MissingField {
        line: row.line,
        field,
    })
}

fn present<'r>(row: &'r Row, field: &'static str) -> Result<&'r str, ValidationError> {
    row.get(field).ok_or(ValidationError::MissingField {
        line: row.line,
        field,
    })
}

/// Decodes the story index, keeping the first entry for each slug.
pub fn story_index(rows: &[Row]) -> Vec<StoryIndexEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for row in rows {
        let entry = match story_index_entry_from_row(row) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping story index row");
                continue;
            }
        };
        if !seen.insert(entry.slug.clone()) {
            let err = ValidationError::DuplicateStorySlug {
                line: entry.line,
                slug: entry.slug,
            };
            tracing::warn!(%err, "skipping story index row");
            continue;
        }
        entries.push(entry);
    }
    entries
}

pub fn affiliates(rows: &[Row]) -> Vec<AffiliateLink> {
    rows.iter()
        .filter_map(|row| match affiliate_from_row(row) {
            Ok(link) => Some(link),
            Err(err) => {
                tracing::warn!(%err, "skipping affiliate row");
                None
            }
        })
        .collect()
}

/// Numeric part of a `chapter-<N>` slug.
pub fn chapter_number(slug: &str) -> Option<u64> {
    let digits = slug.strip_prefix(CHAPTER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn chapter_sort_key(slug: &str) -> String {
    match chapter_number(slug) {
        Some(n) => format!("{CHAPTER_PREFIX}{n:0width$}", width = CHAPTER_NUMBER_WIDTH),
        None => slug.to_owned(),
    }
}

/// Chapter order: numeric when both slugs are `chapter-<N>`, lexicographic
/// otherwise. Numeric slugs are compared through their zero-padded form so
/// the relation stays transitive when both kinds are mixed; the raw slug
/// breaks ties such as `chapter-1` vs `chapter-01`.
pub fn compare_chapter_slugs(a: &str, b: &str) -> Ordering {
    chapter_sort_key(a)
        .cmp(&chapter_sort_key(b))
        .then_with(|| a.cmp(b))
}

pub fn sort_chapter_slugs(slugs: &mut [String]) {
    slugs.sort_by_cached_key(|slug| (chapter_sort_key(slug), slug.clone()));
}

/// Groups paragraph rows into chapters and orders them.
///
/// Paragraph order inside a chapter is the input row order. The first row of
/// a chapter fixes its title.
pub fn build_story(
    entry: &StoryIndexEntry,
    rows: &[Row],
) -> Result<Story, StoryIngestionError> {
    let mut chapters: HashMap<String, Chapter> = HashMap::new();
    let mut slugs = Vec::new();

    for row in rows {
        let paragraph = match paragraph_row_from_row(row) {
            Ok(paragraph) => paragraph,
            Err(err) => {
                tracing::warn!(story = %entry.slug, %err, "skipping paragraph row");
                continue;
            }
        };

        let chapter = chapters
            .entry(paragraph.chapter_slug.clone())
            .or_insert_with(|| {
                slugs.push(paragraph.chapter_slug.clone());
                Chapter {
                    slug: paragraph.chapter_slug.clone(),
                    title: paragraph.chapter_title.clone(),
                    paragraphs: Vec::new(),
                }
            });
        if chapter.title != paragraph.chapter_title {
            tracing::debug!(
                story = %entry.slug,
                chapter = %chapter.slug,
                line = paragraph.line,
                "ignoring differing chapter title"
            );
        }
        chapter.paragraphs.push(Paragraph {
            lang1: paragraph.paragraph_lang1,
            lang2: paragraph.paragraph_lang2,
        });
    }

    if slugs.is_empty() {
        return Err(StoryIngestionError::NoParagraphs {
            slug: entry.slug.clone(),
        });
    }

    sort_chapter_slugs(&mut slugs);
    let chapters = slugs
        .iter()
        .filter_map(|slug| chapters.remove(slug))
        .collect();

    Ok(Story {
        slug: entry.slug.clone(),
        title: entry.title.clone(),
        description: entry.description.clone(),
        cover_image_url: entry.cover_image_url.clone(),
        chapters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: u64, pairs: &[(&str, &str)]) -> Row {
        Row::new(
            line,
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    fn paragraph(line: u64, slug: &str, title: &str, lang1: &str, lang2: &str) -> Row {
        row(
            line,
            &[
                ("chapter_slug", slug),
                ("chapter_title", title),
                ("paragraph_lang1", lang1),
                ("paragraph_lang2", lang2),
            ],
        )
    }

    fn entry(slug: &str) -> StoryIndexEntry {
        StoryIndexEntry {
            line: 2,
            slug: slug.to_owned(),
            title: "The Story".to_owned(),
            description: "About it".to_owned(),
            cover_image_url: String::new(),
            content_source_url: Some("https://example.com/s.csv".to_owned()),
        }
    }

    fn sorted(slugs: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = slugs.iter().map(|s| (*s).to_owned()).collect();
        sort_chapter_slugs(&mut out);
        out
    }

    #[test]
    fn chapters_sort_numerically_when_both_are_numbered() {
        assert_eq!(
            sorted(&["chapter-10", "chapter-2", "chapter-1"]),
            vec!["chapter-1", "chapter-2", "chapter-10"]
        );
    }

    #[test]
    fn chapters_sort_lexicographically_otherwise() {
        assert_eq!(
            sorted(&["prologue", "epilogue", "appendix"]),
            vec!["appendix", "epilogue", "prologue"]
        );
        assert_eq!(
            compare_chapter_slugs("chapter-2", "epilogue"),
            "chapter-2".cmp("epilogue")
        );
    }

    #[test]
    fn chapter_order_is_total_and_idempotent_for_mixed_slugs() {
        let once = sorted(&["chapter-1x", "chapter-10", "chapter-2", "intro", "chapter-01"]);
        let twice = {
            let mut again = once.clone();
            sort_chapter_slugs(&mut again);
            again
        };
        assert_eq!(once, twice);
        for pair in once.windows(2) {
            assert_ne!(compare_chapter_slugs(&pair[0], &pair[1]), Ordering::Greater);
        }
        let pos = |s: &str| once.iter().position(|x| x == s).unwrap();
        assert!(pos("chapter-2") < pos("chapter-10"));
        assert!(pos("chapter-01") < pos("chapter-2"));
    }

    #[test]
    fn chapter_number_requires_exact_pattern() {
        assert_eq!(chapter_number("chapter-7"), Some(7));
        assert_eq!(chapter_number("chapter-"), None);
        assert_eq!(chapter_number("chapter-7b"), None);
        assert_eq!(chapter_number("7"), None);
        assert_eq!(chapter_number("chapter-+7"), None);
    }

    #[test]
    fn build_story_groups_and_preserves_row_order() -> anyhow::Result<()> {
        let rows = vec![
            paragraph(2, "chapter-2", "Two", "b1", "B1"),
            paragraph(3, "chapter-1", "One", "a1", "A1"),
            paragraph(4, "chapter-2", "Two (renamed)", "b2", "B2"),
            paragraph(5, "chapter-1", "One", "a2", "A2"),
        ];
        let story = build_story(&entry("tale"), &rows)?;

        assert_eq!(story.chapters.len(), 2);
        assert_eq!(story.chapters[0].slug, "chapter-1");
        assert_eq!(story.chapters[1].slug, "chapter-2");
        assert_eq!(story.chapters[1].title, "Two");
        let lang1: Vec<_> = story.chapters[1]
            .paragraphs
            .iter()
            .map(|p| p.lang1.as_str())
            .collect();
        assert_eq!(lang1, vec!["b1", "b2"]);
        Ok(())
    }

    #[test]
    fn build_story_drops_invalid_rows() -> anyhow::Result<()> {
        let rows = vec![
            paragraph(2, "", "No slug", "x", "X"),
            paragraph(3, "chapter-1", "", "x", "X"),
            row(4, &[("chapter_slug", "chapter-1"), ("chapter_title", "One")]),
            paragraph(5, "chapter-1", "One", "", ""),
            paragraph(6, "../escape", "Bad", "x", "X"),
            paragraph(7, "chapter-1", "One", "kept", "KEPT"),
        ];
        let story = build_story(&entry("tale"), &rows)?;

        assert_eq!(story.chapters.len(), 1);
        assert_eq!(story.chapters[0].paragraphs.len(), 1);
        assert_eq!(story.chapters[0].paragraphs[0].lang1, "kept");
        Ok(())
    }

    #[test]
    fn build_story_without_valid_rows_is_an_ingestion_error() {
        let rows = vec![paragraph(2, "", "", "", "")];
        let err = build_story(&entry("empty"), &rows).unwrap_err();
        assert!(matches!(err, StoryIngestionError::NoParagraphs { .. }));
        assert_eq!(err.slug(), "empty");
    }

    #[test]
    fn story_index_keeps_first_duplicate() {
        let rows = vec![
            row(2, &[("slug", "a"), ("title", "First")]),
            row(3, &[("slug", "a"), ("title", "Second")]),
            row(4, &[("slug", "bad slug"), ("title", "Spaces")]),
            row(5, &[("slug", "b"), ("title", "B"), ("content_csv_url", "https://x/b.csv")]),
        ];
        let entries = story_index(&rows);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].content_source_url, None);
        assert_eq!(entries[1].content_source_url.as_deref(), Some("https://x/b.csv"));
    }

    #[test]
    fn affiliates_require_link_url() {
        let rows = vec![
            row(2, &[("product_name", "Book"), ("link_url", "https://shop/1")]),
            row(3, &[("product_name", "Nothing"), ("link_url", "")]),
        ];
        let links = affiliates(&rows);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].product_name, "Book");
        assert_eq!(links[0].alt_text, "");
    }
}
