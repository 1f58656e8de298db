use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::provider::Transport;
use crate::resolver::compile_pattern;

pub const DEFAULT_BASE_URL: &str = "https://sourceforge.net/projects/waydroid/files/images";

/// Built-in category table: one entry per image flavor, `directory/file-glob`
/// relative to the project files root.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    // System images
    (
        "SYS_VANILLA_X86_64_20",
        "system/lineage/waydroid_x86_64/lineage-20*VANILLA*x86_64*system.zip",
    ),
    (
        "SYS_GAPPS_X86_64_20",
        "system/lineage/waydroid_x86_64/lineage-20*GAPPS*x86_64*system.zip",
    ),
    (
        "SYS_VANILLA_ARM64_20",
        "system/lineage/waydroid_arm64/lineage-20*VANILLA*arm64*system.zip",
    ),
    (
        "SYS_GAPPS_ARM64_20",
        "system/lineage/waydroid_arm64/lineage-20*GAPPS*arm64*system.zip",
    ),
    (
        "SYS_VANILLA_X86_64_18",
        "system/lineage/waydroid_x86_64/lineage-18*VANILLA*x86_64*system.zip",
    ),
    (
        "SYS_GAPPS_X86_64_18",
        "system/lineage/waydroid_x86_64/lineage-18*GAPPS*x86_64*system.zip",
    ),
    (
        "SYS_VANILLA_ARM64_18",
        "system/lineage/waydroid_arm64/lineage-18*VANILLA*arm64*system.zip",
    ),
    (
        "SYS_GAPPS_ARM64_18",
        "system/lineage/waydroid_arm64/lineage-18*GAPPS*arm64*system.zip",
    ),
    // Vendor images
    (
        "VENDOR_X86_64_20",
        "vendor/waydroid_x86_64/lineage-20*waydroid_x86_64*vendor.zip",
    ),
    (
        "VENDOR_ARM64_20",
        "vendor/waydroid_arm64/lineage-20*waydroid_arm64*vendor.zip",
    ),
    (
        "VENDOR_X86_64_18",
        "vendor/waydroid_x86_64/lineage-18*waydroid_x86_64*vendor.zip",
    ),
    (
        "VENDOR_ARM64_18",
        "vendor/waydroid_arm64/lineage-18*waydroid_arm64*vendor.zip",
    ),
];

#[derive(Debug, Clone)]
pub struct Category {
    pub key: String,
    pub directory: String,
    /// Filename pattern, compiled case-insensitive and anchored at both ends.
    pub pattern: regex::Regex,
    pub raw_pattern: String,
}

impl Category {
    /// `spec` is `directory/file-pattern`; the last path segment is the
    /// filename glob (or `re:` regex), everything before it the remote
    /// directory.
    pub fn parse(key: &str, spec: &str) -> Result<Self> {
        let Some((directory, file_pattern)) = spec.rsplit_once('/') else {
            bail!("category {}: pattern {:?} has no directory part", key, spec);
        };
        if directory.is_empty() || file_pattern.is_empty() {
            bail!("category {}: pattern {:?} has an empty segment", key, spec);
        }

        let pattern = compile_pattern(file_pattern)
            .with_context(|| format!("category {}: invalid pattern {:?}", key, file_pattern))?;

        Ok(Category {
            key: key.to_string(),
            directory: directory.to_string(),
            pattern,
            raw_pattern: file_pattern.to_string(),
        })
    }
}

/// Immutable per-run configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub transport: Transport,
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    transport: Option<Transport>,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    key: String,
    pattern: String,
}

impl Config {
    pub fn default_table() -> Result<Self> {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(key, spec)| Category::parse(key, spec))
            .collect::<Result<Vec<_>>>()?;

        Ok(Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: Transport::Html,
            categories,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        let categories = if file.categories.is_empty() {
            Self::default_table()?.categories
        } else {
            file.categories
                .iter()
                .map(|entry| Category::parse(&entry.key, &entry.pattern))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Config {
            base_url: file
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            transport: file.transport.unwrap_or(Transport::Html),
            categories,
        })
    }
}
