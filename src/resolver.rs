use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;

use crate::config::{Category, Config};
use crate::provider::{self, FileEntry};

/// Final category -> download-URL-or-absent mapping for a run.
pub type Resolution = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub url: String,
    /// YYYYMMDD token from the filename; `None` ranks below any dated entry.
    pub date_key: Option<String>,
}

/// Compile a filename pattern: glob-style (`*`/`?`) by default, raw regex with
/// a `re:` prefix. Either way the match is case-insensitive and anchored.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let body = match pattern.strip_prefix("re:") {
        Some(raw) => raw.to_string(),
        None => glob_to_regex(pattern),
    };
    Regex::new(&format!("(?i)^{}$", body))
        .with_context(|| format!("invalid pattern: {}", pattern))
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out
}

/// First run of exactly eight digits in `name`. Longer digit runs do not
/// count as dates, so the search continues past them.
pub fn date_key(name: &str) -> Option<String> {
    let re = Regex::new(r"(?:^|[^0-9])([0-9]{8})(?:[^0-9]|$)").unwrap();
    re.captures(name).map(|caps| caps[1].to_string())
}

/// Latest-wins selection: maximum date key, dateless entries last, ties in
/// favor of the first-seen entry.
pub fn select_latest(entries: &[FileEntry], pattern: &Regex) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for entry in entries {
        if !pattern.is_match(&entry.name) {
            continue;
        }
        let candidate = Candidate {
            name: entry.name.clone(),
            url: entry.url.clone(),
            date_key: date_key(&entry.name),
        };
        best = match best {
            Some(current) if candidate.date_key <= current.date_key => Some(current),
            _ => Some(candidate),
        };
    }

    best
}

/// Resolve one category to its newest matching file. Fetch and parse failures
/// degrade to `None`; they never abort the run.
pub async fn resolve(client: &Client, config: &Config, category: &Category) -> Option<Candidate> {
    let entries = match provider::fetch_listing(
        client,
        config.transport,
        &config.base_url,
        &category.directory,
    )
    .await
    {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("  error fetching {}: {}", category.directory, e);
            return None;
        }
    };

    println!("  found {} files in {}", entries.len(), category.directory);

    let latest = select_latest(&entries, &category.pattern);
    if latest.is_none() {
        println!("  no files matching pattern: {}", category.raw_pattern);
    }
    latest
}
