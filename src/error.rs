use thiserror::Error;

/// Failure to obtain or decode a whole table.
///
/// `Fetch` and `HttpStatus` mean the table could not be reached; `Parse`
/// and `RaggedRecord` mean the payload was not well-formed delimited text.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("table url must be an absolute http/https url: {url}")]
    InvalidUrl { url: String },

    #[error("fetch table: {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch table: {url}: HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("parse table: {url}")]
    Parse {
        url: String,
        #[source]
        source: csv::Error,
    },

    #[error("parse table: {url}: line {line} has {found} fields, header has {expected}")]
    RaggedRecord {
        url: String,
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl SourceError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::RaggedRecord { .. })
    }
}

/// A single row that cannot be used. Always row-level and non-fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("line {line}: missing required field `{field}`")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: slug is not url-safe: {slug:?}")]
    InvalidSlug { line: u64, slug: String },

    #[error("line {line}: duplicate story slug {slug:?} (first occurrence wins)")]
    DuplicateStorySlug { line: u64, slug: String },
}

/// A story that could not be ingested. Never aborts the run.
#[derive(Debug, Error)]
pub enum StoryIngestionError {
    #[error("story {slug}: no content source url")]
    MissingContentUrl { slug: String },

    #[error("story {slug}: content table unavailable")]
    Source {
        slug: String,
        #[source]
        source: SourceError,
    },

    #[error("story {slug}: no valid paragraph rows")]
    NoParagraphs { slug: String },
}

impl StoryIngestionError {
    pub fn slug(&self) -> &str {
        match self {
            Self::MissingContentUrl { slug }
            | Self::Source { slug, .. }
            | Self::NoParagraphs { slug } => slug,
        }
    }
}
