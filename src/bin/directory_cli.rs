//! Directory CLI
//!
//! Queries the content API (or a JSON fixture) through the same `Directory`
//! methods the site uses and prints the result as pretty JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use profile_directory::{
    Directory, DirectoryConfig, ExecutionContext, HttpTransport, InMemoryBackend, ProfileQuery,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ContextArg {
    Server,
    Client,
}

impl From<ContextArg> for ExecutionContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Server => ExecutionContext::Server,
            ContextArg::Client => ExecutionContext::Client,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "directory_cli", about = "Query the profile directory")]
struct Cli {
    /// Execution context used to pick the content API URL
    #[arg(long, value_enum, default_value = "server")]
    context: ContextArg,

    /// Serve from a JSON fixture (`{ "items/person": [...], ... }`) instead of HTTP
    #[arg(long, env = "DIRECTORY_FIXTURE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One page of profiles in random order
    Profiles {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Profile detail with merged timeline
    Profile { slug: String },
    /// All published areas
    Areas,
    /// One area by slug
    Area { slug: String },
    /// All published topics
    Topics,
    /// Featured video id from configuration
    Video,
}

#[derive(Serialize)]
struct PageOutput<T: Serialize> {
    page: usize,
    pages: usize,
    total: usize,
    data: Vec<T>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn build_directory(cli: &Cli, config: &DirectoryConfig) -> Result<Directory> {
    if let Some(path) = &cli.fixture {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let fixture: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Fixture {} is not valid JSON", path.display()))?;
        let backend = InMemoryBackend::from_fixture(fixture)?;
        tracing::info!(path = %path.display(), "Serving from fixture");
        return Ok(Directory::new(backend));
    }

    let base_url = config.base_url(cli.context.into());
    tracing::info!(%base_url, "Using content API");
    Ok(Directory::new(HttpTransport::new(base_url)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_directory=info,directory_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DirectoryConfig::from_env();
    let directory = build_directory(&cli, &config)?;

    match &cli.command {
        Command::Profiles {
            limit,
            page,
            area,
            search,
        } => {
            let mut query = ProfileQuery::for_page(*page, *limit);
            query.area_slug = area.clone();
            query.name_query = search.clone();

            let result = directory.list_profiles(&query).await;
            print_json(&PageOutput {
                page: (*page).max(1),
                pages: result.page_count(*limit),
                total: result.total,
                data: result.data,
            })?;
        }
        Command::Profile { slug } => match directory.profile_detail(slug).await {
            Some(detail) => print_json(&detail)?,
            None => anyhow::bail!("No published profile with slug '{}'", slug),
        },
        Command::Areas => print_json(&directory.areas().await)?,
        Command::Area { slug } => match directory.area_by_slug(slug).await {
            Some(area) => print_json(&area)?,
            None => anyhow::bail!("No published area with slug '{}'", slug),
        },
        Command::Topics => print_json(&directory.topics().await)?,
        Command::Video => print_json(&config.featured_video.video_id())?,
    }

    Ok(())
}
