use chrono::Utc;

use crate::resolver::{Resolution, date_key};

/// Newest YYYYMMDD date across all resolved URLs; today's date when nothing
/// resolved, so the output version is always well-formed.
pub fn derive_version(resolution: &Resolution) -> String {
    resolution
        .values()
        .flatten()
        .filter_map(|url| date_key(url))
        .max()
        .unwrap_or_else(|| Utc::now().format("%Y%m%d").to_string())
}
