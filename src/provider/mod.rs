pub mod feed;
pub mod html;
pub mod json;

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single file visible in a remote directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned status: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed listing: {0}")]
    Parse(String),
}

/// How directory listings are retrieved from SourceForge. The transports are
/// interchangeable: each yields the same (filename, download URL) pairs for a
/// given directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Scrape the files web page for download links
    Html,
    /// Paginated JSON listing, followed to the last page
    Json,
    /// Per-directory RSS feed
    Rss,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Html => write!(f, "html"),
            Transport::Json => write!(f, "json"),
            Transport::Rss => write!(f, "rss"),
        }
    }
}

pub async fn fetch_listing(
    client: &Client,
    transport: Transport,
    base_url: &str,
    directory: &str,
) -> Result<Vec<FileEntry>, ListingError> {
    match transport {
        Transport::Html => html::fetch_listing(client, base_url, directory).await,
        Transport::Json => json::fetch_listing(client, base_url, directory).await,
        Transport::Rss => feed::fetch_listing(client, base_url, directory).await,
    }
}

/// Canonical SourceForge download URL for a file within a directory.
pub fn download_url(base_url: &str, directory: &str, name: &str) -> String {
    format!("{}/{}/{}/download", base_url, directory, name)
}
