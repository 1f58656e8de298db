use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;

mod config;
mod provider;
mod record;
mod resolver;
mod template;
mod version;

use config::Config;
use provider::Transport;
use resolver::Resolution;

const BUILTIN_TEMPLATE: &str = include_str!("waydroid-image.spec.in");

#[derive(Parser, Debug)]
#[command(name = "waydroid-latest")]
#[command(about = "Updates a packaging spec with the latest Waydroid image URLs from SourceForge", version, long_about = None)]
struct Args {
    /// Spec template containing @VERSION@, @TIMESTAMP@ and per-category placeholders
    #[arg(short, long, default_value = "waydroid-image.spec")]
    template: PathBuf,

    /// Destination for the materialized spec (defaults to the template path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Destination for the resolved URL record
    #[arg(short, long, default_value = "waydroid-urls.json")]
    urls: PathBuf,

    /// TOML file overriding the built-in category table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory listing transport
    #[arg(long, value_enum)]
    transport: Option<Transport>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Write the built-in template skeleton if the template file is absent
    #[arg(long)]
    seed_template: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default_table()?,
    };
    if let Some(transport) = args.transport {
        config.transport = transport;
    }

    if !args.template.exists() {
        if args.seed_template {
            fs::write(&args.template, BUILTIN_TEMPLATE)
                .with_context(|| format!("failed to seed template {}", args.template.display()))?;
            println!("Seeded template {}", args.template.display());
        } else {
            bail!(
                "template {} not found (pass --seed-template to create a skeleton)",
                args.template.display()
            );
        }
    }
    let template_text = fs::read_to_string(&args.template)
        .with_context(|| format!("failed to read template {}", args.template.display()))?;

    let client = reqwest::Client::builder()
        .user_agent(concat!("waydroid-latest/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    println!(
        "Scanning {} ({} categories, {} transport)",
        config.base_url,
        config.categories.len(),
        config.transport
    );

    let mut resolution = Resolution::new();
    for category in &config.categories {
        println!("\nSearching for {}...", category.key);
        let found = resolver::resolve(&client, &config, category).await;
        match &found {
            Some(candidate) => println!("  latest: {}", candidate.name),
            None => println!("  WARNING: no file found for {}", category.key),
        }
        resolution.insert(category.key.clone(), found.map(|c| c.url));
    }

    let found_count = resolution.values().flatten().count();
    println!("\nFound {}/{} image URLs", found_count, config.categories.len());
    if found_count == 0 {
        bail!("no image URLs resolved; the spec would contain no usable sources");
    }

    let version = version::derive_version(&resolution);
    let now = Utc::now();
    println!("Using version: {}", version);

    let (content, report) =
        template::materialize(&template_text, &resolution, &version, &now.to_rfc3339());
    for key in &report.missing {
        eprintln!("  warning: placeholder @{}@ not found in template", key);
    }

    let output = args.output.as_ref().unwrap_or(&args.template);
    fs::write(output, &content)
        .with_context(|| format!("failed to write spec {}", output.display()))?;

    let record = record::UrlRecord {
        version: version.clone(),
        timestamp: now,
        urls: resolution,
    };
    record.write(&args.urls)?;

    println!(
        "Updated {} with {} URLs (version {})",
        output.display(),
        report.updated,
        version
    );
    println!("URL record saved to {}", args.urls.display());

    Ok(())
}
