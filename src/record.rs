use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolver::Resolution;

/// Side record of a run, written next to the spec for downstream inspection:
/// the derived version, when it was generated, and every category's URL (or
/// null where nothing resolved).
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlRecord {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub urls: Resolution,
}

impl UrlRecord {
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write URL record {}", path.display()))?;
        Ok(())
    }
}
