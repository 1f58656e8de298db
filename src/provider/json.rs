use reqwest::Client;
use serde::Deserialize;

use super::{FileEntry, ListingError, download_url};

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    files: Vec<ListedFile>,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    pages: u32,
}

#[derive(Debug, Deserialize)]
struct ListedFile {
    name: String,
    #[serde(default)]
    download_url: Option<String>,
}

/// Fetch every page of the JSON directory listing. SourceForge caps page size
/// server-side, so pagination is followed until the reported last page.
pub async fn fetch_listing(
    client: &Client,
    base_url: &str,
    directory: &str,
) -> Result<Vec<FileEntry>, ListingError> {
    let mut entries = Vec::new();
    let mut page = 1u32;

    loop {
        let url = format!("{}/{}/?format=json&page={}", base_url, directory, page);

        let response = client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ListingError::Status {
                url,
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let listing = parse_page(&body)?;

        if listing.files.is_empty() {
            break;
        }
        for file in listing.files {
            let url = file
                .download_url
                .unwrap_or_else(|| download_url(base_url, directory, &file.name));
            entries.push(FileEntry {
                name: file.name,
                url,
            });
        }

        if listing.pages == 0 || listing.page >= listing.pages {
            break;
        }
        page += 1;
    }

    Ok(entries)
}

fn parse_page(body: &str) -> Result<ListingPage, ListingError> {
    serde_json::from_str(body).map_err(|e| ListingError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_page() {
        let body = r#"{
            "files": [
                {"name": "lineage-20-20230115-VANILLA-x86_64-system.zip",
                 "download_url": "https://example.net/d/lineage-20-20230115-VANILLA-x86_64-system.zip"},
                {"name": "lineage-20-20221201-VANILLA-x86_64-system.zip"}
            ],
            "page": 1,
            "pages": 2
        }"#;

        let page = parse_page(body).unwrap();
        assert_eq!(page.files.len(), 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 2);
        assert_eq!(
            page.files[0].download_url.as_deref(),
            Some("https://example.net/d/lineage-20-20230115-VANILLA-x86_64-system.zip")
        );
        assert!(page.files[1].download_url.is_none());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let page = parse_page("{}").unwrap();
        assert!(page.files.is_empty());
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_page("<html>busy</html>").unwrap_err();
        assert!(matches!(err, ListingError::Parse(_)));
    }
}
