use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolhub::config::Config;
use schoolhub::state::Repositories;
use schoolhub_core::cache::collection_key;
use schoolhub_core::entity::EntityKind;

/// Schoolhub - inspect the cached demo school
#[derive(Parser, Debug)]
#[command(name = "schoolhub")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dump one collection (e.g. `users`, `clubs`) as populated JSON
    #[arg(long, short)]
    collection: Option<String>,

    /// Default cache TTL in milliseconds, overriding CACHE_TTL_MS
    #[arg(long)]
    ttl_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolhub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(ttl_ms) = cli.ttl_ms {
        config = config.with_cache_ttl_ms(ttl_ms);
    }

    let repositories = Repositories::with_demo_data(&config).await?;

    match cli.collection {
        Some(name) => {
            let kind = EntityKind::from_collection(&name)
                .ok_or_else(|| anyhow!("unknown collection `{name}`"))?;
            let records = repositories.collection(kind).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        None => {
            for kind in EntityKind::ALL {
                let records = repositories.collection(kind).await?;
                println!(
                    "{:<16} {:>4} records  ttl {:?}",
                    collection_key(kind),
                    records.len(),
                    config.ttl_for(kind)
                );
            }
        }
    }

    tracing::info!("Done");
    Ok(())
}
