use std::collections::HashSet;

use reqwest::Client;
use scraper::{Html, Selector};

use super::{FileEntry, ListingError, download_url};

pub async fn fetch_listing(
    client: &Client,
    base_url: &str,
    directory: &str,
) -> Result<Vec<FileEntry>, ListingError> {
    let url = format!("{}/{}/", base_url, directory);

    let response = client
        .get(&url)
        .header("Accept", "text/html")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ListingError::Status {
            url,
            status: response.status(),
        });
    }

    let html = response.text().await?;
    Ok(parse_listing(&html, base_url, directory))
}

/// Extract filenames from a SourceForge files page. Download links look like
/// `.../files/<path>/<name>/download`; anything else on the page is ignored.
pub fn parse_listing(html: &str, base_url: &str, directory: &str) -> Vec<FileEntry> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for link in document.select(&link_selector) {
        let href = match link.value().attr("href") {
            Some(href) => href,
            None => continue,
        };

        if !href.contains("/files/") {
            continue;
        }
        let stripped = match href.strip_suffix("/download") {
            Some(stripped) => stripped,
            None => continue,
        };
        let name = match stripped.rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };

        // The same file is linked several times per page
        if seen.insert(name.to_string()) {
            entries.push(FileEntry {
                name: name.to_string(),
                url: download_url(base_url, directory, name),
            });
        }
    }

    entries
}
