use serde::Serialize;

use crate::config::{CopyText, SiteConfig};
use crate::emit::{DATA_DIR, HOME_FILE, sibling_chapter_href};
use crate::formats::{ChapterLink, ChapterPage, HomePage, StoryCard};

pub const SCRIPT_PATH: &str = "assets/js/main.js";
pub const STYLES_PATH: &str = "assets/css/styles.css";
pub const SCRIPT: &str = include_str!("../assets/main.js");
pub const STYLES: &str = include_str!("../assets/styles.css");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Chapter,
}

impl PageKind {
    /// Relative prefix from a page of this kind back to the site root.
    fn root_prefix(self) -> &'static str {
        match self {
            Self::Home => "",
            Self::Chapter => "../../",
        }
    }
}

/// Settings block every page embeds for `main.js`.
#[derive(Debug, Serialize)]
struct ClientConfig<'a> {
    page: PageKind,
    data_base: String,
    countdown_seconds: u32,
    copy: &'a CopyText,
}

/// Turns page data into HTML. One renderer serves every page variant.
#[derive(Debug, Clone, Copy)]
pub struct SiteRenderer<'a> {
    config: &'a SiteConfig,
}

impl<'a> SiteRenderer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    fn copy(&self) -> &'a CopyText {
        &self.config.copy
    }

    pub fn render_home(&self, home: &HomePage) -> anyhow::Result<String> {
        let copy = self.copy();
        let mut body = String::new();
        body.push_str("    <div class=\"container\">\n");
        body.push_str(&format!(
            "        <h1>{}</h1>\n        <p class=\"tagline\">{}</p>\n",
            escape_html(&copy.home_heading),
            escape_html(&copy.tagline)
        ));
        body.push_str(&format!(
            "        <div class=\"search-bar\">\n            <input type=\"search\" id=\"searchInput\" placeholder=\"{}\" aria-label=\"{}\">\n            <button type=\"button\" id=\"searchButton\">{}</button>\n        </div>\n",
            escape_html(&copy.search_placeholder),
            escape_html(&copy.search_placeholder),
            escape_html(&copy.search_button)
        ));
        body.push_str("        <div id=\"storiesList\" class=\"stories-grid\">\n");
        if home.stories.is_empty() {
            body.push_str(&format!("            <p>{}</p>\n", escape_html(&copy.no_stories)));
        }
        for card in &home.stories {
            body.push_str(&self.story_card(card));
        }
        body.push_str("        </div>\n    </div>\n");

        self.page(PageKind::Home, &copy.site_title, &body)
    }

    fn story_card(&self, card: &StoryCard) -> String {
        let href = match &card.first_chapter_slug {
            Some(chapter) => crate::emit::chapter_page_path(&card.slug, chapter),
            None => "#".to_owned(),
        };
        let mut html = String::new();
        html.push_str(&format!(
            "            <a href=\"{}\" class=\"story-card\">\n",
            escape_html(&href)
        ));
        if !card.cover_image_url.is_empty() {
            html.push_str(&format!(
                "                <img src=\"{}\" alt=\"{} Cover\">\n",
                escape_html(&card.cover_image_url),
                escape_html(&card.title)
            ));
        }
        html.push_str(&format!(
            "                <div class=\"story-card-content\">\n                    <h3>{}</h3>\n                    <p>{}</p>\n                    <span class=\"read-link\">{}</span>\n                </div>\n            </a>\n",
            escape_html(&card.title),
            escape_html(&card.description),
            escape_html(&self.copy().read_story)
        ));
        html
    }

    pub fn render_chapter(&self, page: &ChapterPage) -> anyhow::Result<String> {
        let copy = self.copy();
        let mut body = String::new();
        body.push_str("    <div class=\"container chapter-container\">\n");
        body.push_str(&format!(
            "        <h1 id=\"chapterTitle\">{}</h1>\n        <h2 id=\"storyTitle\">{} {}</h2>\n",
            escape_html(&page.chapter_title),
            escape_html(&copy.story_from),
            escape_html(&page.story_title)
        ));

        body.push_str("        <nav class=\"chapter-navigation\">\n");
        body.push_str(&nav_link("prevChapter", page.prev.as_ref(), &copy.previous_chapter));
        body.push_str(&format!(
            "            <a href=\"{}{HOME_FILE}\" class=\"nav-button\">{}</a>\n",
            PageKind::Chapter.root_prefix(),
            escape_html(&copy.back_to_stories)
        ));
        body.push_str(&nav_link("nextChapter", page.next.as_ref(), &copy.next_chapter));
        body.push_str(&format!(
            "            <select id=\"chapterPicker\" class=\"chapter-picker hidden\" aria-label=\"{}\"></select>\n",
            escape_html(&copy.chapter_picker)
        ));
        body.push_str("        </nav>\n");

        body.push_str(&format!(
            "        <div id=\"affiliateWall\" class=\"affiliate-wall\">\n            <p>{}</p>\n            <button type=\"button\" id=\"unlockChapterBtn\" class=\"unlock-button\">{}</button>\n            <p id=\"unlockCountdown\" class=\"countdown hidden\" aria-live=\"polite\"></p>\n        </div>\n",
            escape_html(&copy.unlock_prompt),
            escape_html(&copy.unlock_button)
        ));

        body.push_str("        <div id=\"chapterContent\" class=\"chapter-content hidden\">\n");
        for paragraph in &page.paragraphs {
            body.push_str(&format!(
                "            <div class=\"paragraph-pair\">\n                <p class=\"lang-one\">{}</p>\n                <p class=\"lang-two\">{}</p>\n            </div>\n",
                escape_html(&paragraph.lang1),
                escape_html(&paragraph.lang2)
            ));
        }
        body.push_str("        </div>\n    </div>\n");

        let title = format!("{} - {}", page.chapter_title, page.story_title);
        self.page(PageKind::Chapter, &title, &body)
    }

    fn page(&self, kind: PageKind, title: &str, body: &str) -> anyhow::Result<String> {
        let root = kind.root_prefix();
        let client_config = ClientConfig {
            page: kind,
            data_base: format!("{root}{DATA_DIR}/"),
            countdown_seconds: self.config.site.countdown_seconds(),
            copy: self.copy(),
        };
        let client_json = serde_json::to_string(&client_config)
            .map_err(|err| anyhow::anyhow!("serialize client config: {err}"))?
            .replace("</", "<\\/");

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(
            "<html lang=\"{}\">\n",
            escape_html(&self.config.site.lang)
        ));
        html.push_str("<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
        html.push_str(&format!(
            "    <link rel=\"stylesheet\" href=\"{root}{STYLES_PATH}\">\n</head>\n<body>\n"
        ));
        html.push_str("    <header class=\"top-banner\" id=\"topBanner\"></header>\n\n");
        html.push_str(body);
        html.push_str(&format!(
            "\n    <footer>\n        <p>&copy; {} {}. All rights reserved.</p>\n    </footer>\n\n",
            self.config.site.copyright_year(),
            escape_html(&self.copy().footer_owner)
        ));
        html.push_str(&format!(
            "    <script type=\"application/json\" id=\"site-config\">{client_json}</script>\n"
        ));
        html.push_str(&format!(
            "    <script src=\"{root}{SCRIPT_PATH}\"></script>\n</body>\n</html>\n"
        ));
        Ok(html)
    }
}

fn nav_link(id: &str, link: Option<&ChapterLink>, label: &str) -> String {
    match link {
        Some(link) => format!(
            "            <a href=\"{}\" id=\"{id}\" class=\"nav-button\" title=\"{}\">{}</a>\n",
            escape_html(&sibling_chapter_href(&link.slug)),
            escape_html(&link.title),
            escape_html(label)
        ),
        None => format!(
            "            <a href=\"#\" id=\"{id}\" class=\"nav-button hidden\">{}</a>\n",
            escape_html(label)
        ),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
