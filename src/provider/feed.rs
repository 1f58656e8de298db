use reqwest::Client;
use rss::Channel;

use super::{FileEntry, ListingError, download_url};

pub async fn fetch_listing(
    client: &Client,
    base_url: &str,
    directory: &str,
) -> Result<Vec<FileEntry>, ListingError> {
    let url = feed_url(base_url, directory);

    let response = client
        .get(&url)
        .header("Accept", "application/rss+xml")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ListingError::Status {
            url,
            status: response.status(),
        });
    }

    let body = response.bytes().await?;
    parse_feed(&body, base_url, directory)
}

/// SourceForge serves per-directory feeds at the project root, not under
/// `/files/`: `https://sourceforge.net/projects/<proj>/rss?path=/<dir>`.
pub fn feed_url(base_url: &str, directory: &str) -> String {
    match base_url.split_once("/files/") {
        Some((project, prefix)) => {
            let path = format!("/{}/{}", prefix, directory);
            let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
            format!("{}/rss?path={}&limit=200", project, encoded)
        }
        None => format!("{}/{}/rss", base_url, directory),
    }
}

pub fn parse_feed(
    bytes: &[u8],
    base_url: &str,
    directory: &str,
) -> Result<Vec<FileEntry>, ListingError> {
    let channel = Channel::read_from(bytes).map_err(|e| ListingError::Parse(e.to_string()))?;

    Ok(channel
        .into_items()
        .into_iter()
        .filter_map(|item| item.link)
        .filter_map(|link| {
            file_name(&link).map(|name| FileEntry {
                url: download_url(base_url, directory, &name),
                name,
            })
        })
        .collect())
}

fn file_name(link: &str) -> Option<String> {
    let trimmed = link.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/download").unwrap_or(trimmed);
    trimmed
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://sourceforge.net/projects/waydroid/files/images";

    #[test]
    fn feed_url_targets_project_root() {
        let url = feed_url(BASE, "vendor/waydroid_arm64");
        assert_eq!(
            url,
            "https://sourceforge.net/projects/waydroid/rss?path=%2Fimages%2Fvendor%2Fwaydroid_arm64&limit=200"
        );
    }

    #[test]
    fn parses_feed_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0"><channel>
            <title>waydroid files</title>
            <link>https://sourceforge.net/projects/waydroid/files/</link>
            <description>files</description>
            <item>
              <title>/images/vendor/waydroid_arm64/lineage-20-20230115-waydroid_arm64-vendor.zip</title>
              <link>https://sourceforge.net/projects/waydroid/files/images/vendor/waydroid_arm64/lineage-20-20230115-waydroid_arm64-vendor.zip/download</link>
            </item>
            <item>
              <title>older</title>
              <link>https://sourceforge.net/projects/waydroid/files/images/vendor/waydroid_arm64/lineage-20-20221201-waydroid_arm64-vendor.zip/</link>
            </item>
            </channel></rss>"#;

        let entries = parse_feed(xml.as_bytes(), BASE, "vendor/waydroid_arm64").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].name,
            "lineage-20-20230115-waydroid_arm64-vendor.zip"
        );
        assert_eq!(
            entries[0].url,
            format!(
                "{}/vendor/waydroid_arm64/lineage-20-20230115-waydroid_arm64-vendor.zip/download",
                BASE
            )
        );
        assert_eq!(
            entries[1].name,
            "lineage-20-20221201-waydroid_arm64-vendor.zip"
        );
    }

    #[test]
    fn malformed_feed_is_a_parse_error() {
        let err = parse_feed(b"<html>not a feed</html>", BASE, "vendor").unwrap_err();
        assert!(matches!(err, ListingError::Parse(_)));
    }
}
