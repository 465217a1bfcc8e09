use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the fetch/parse/serialize pipeline.
///
/// Route handlers convert these into a generic 500 response; there is no
/// per-kind user-facing message and no retry anywhere.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("upstream returned {0}")]
    UpstreamStatus(StatusCode),

    #[error("failed to parse feed XML: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("failed to write feed XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("malformed feed: {0}")]
    MalformedFeed(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
