use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use folio_service::{
    Backend, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, FallbackPolicy, SiteConfig, SourceKind,
    repositories::SqliteDocumentStore, resources,
};
use serde::Serialize;
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse site content from the mock, store or REST source")]
struct Cli {
    /// Content source: mock, store or rest. Defaults to FOLIO_CONTENT_SOURCE
    #[arg(long)]
    source: Option<SourceKind>,

    /// Base URL of the content API
    #[arg(long)]
    api_url: Option<String>,

    /// SQLite database holding the document store
    #[arg(long)]
    database_url: Option<String>,

    /// Report backend failures instead of falling back to bundled content
    #[arg(long)]
    fail_fast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Posts,
    Projects,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of a resource
    List {
        resource: Resource,
        #[arg(short, long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Print a single record
    Get { resource: Resource, id: String },
    /// Write the bundled fixtures into the document store
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("folio_service=warn".parse()?))
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(SiteConfig::from_env(), &cli);

    match cli.command {
        Commands::List {
            resource,
            page,
            limit,
        } => {
            let backend = Backend::connect(&config)?;
            match resource {
                Resource::Posts => {
                    let service = resources::blog_posts(backend, config.fallback)?;
                    print_json(&service.list(page, limit).await?)?;
                }
                Resource::Projects => {
                    let service = resources::projects(backend, config.fallback)?;
                    print_json(&service.list(page, limit).await?)?;
                }
            }
        }
        Commands::Get { resource, id } => {
            let backend = Backend::connect(&config)?;
            match resource {
                Resource::Posts => {
                    let service = resources::blog_posts(backend, config.fallback)?;
                    print_json(&service.by_id(&id).await?)?;
                }
                Resource::Projects => {
                    let service = resources::projects(backend, config.fallback)?;
                    print_json(&service.by_id(&id).await?)?;
                }
            }
        }
        Commands::Seed => {
            let store = SqliteDocumentStore::connect(&config.database_url)?;
            let count = resources::seed_fixtures(&store, Utc::now().naive_utc())?;
            println!("Seeded {count} documents into {}", config.database_url);
        }
    }

    Ok(())
}

fn apply_overrides(mut config: SiteConfig, cli: &Cli) -> SiteConfig {
    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(api_url) = &cli.api_url {
        config.api_base_url = api_url.clone();
    }
    if let Some(database_url) = &cli.database_url {
        config.database_url = database_url.clone();
    }
    if cli.fail_fast {
        config.fallback = FallbackPolicy::FailFast;
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
