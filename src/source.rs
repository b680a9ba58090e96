use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::error::SourceError;
use crate::formats::Row;

/// Something that can hand back a table of rows for a location.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_table(&self, url: &str) -> Result<Vec<Row>, SourceError>;
}

/// Published spreadsheet CSV exports over HTTP. No caching, no retries.
#[derive(Debug, Clone)]
pub struct HttpTableSource {
    client: reqwest::Client,
}

impl HttpTableSource {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build table http client: {err}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TableSource for HttpTableSource {
    async fn fetch_table(&self, url: &str) -> Result<Vec<Row>, SourceError> {
        let parsed = validate_table_url(url)?;
        tracing::info!(%url, "fetch table");

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, "dualstories/0.1")
            .header(ACCEPT, "text/csv,text/plain;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|source| SourceError::Fetch {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_owned(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| SourceError::Fetch {
            url: url.to_owned(),
            source,
        })?;
        parse_table(url, &body)
    }
}

pub fn validate_table_url(url: &str) -> Result<Url, SourceError> {
    let invalid = || SourceError::InvalidUrl {
        url: url.to_owned(),
    };
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Parses delimited text whose first record is the header.
///
/// Every field is trimmed and records that are blank after trimming are
/// skipped, including whitespace-only lines. A remaining record whose field
/// count differs from the header, or a payload that is not UTF-8, is a parse
/// error.
pub fn parse_table(url: &str, payload: &[u8]) -> Result<Vec<Row>, SourceError> {
    let payload = payload.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(payload);
    let parse_error = |source| SourceError::Parse {
        url: url.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(payload);
    let headers = reader.headers().map_err(parse_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map(csv::Position::line).unwrap_or_default();
        if record.len() != headers.len() {
            return Err(SourceError::RaggedRecord {
                url: url.to_owned(),
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, value)| (column.to_owned(), value.to_owned()))
            .collect();
        rows.push(Row::new(line, fields));
    }

    Ok(rows)
}
