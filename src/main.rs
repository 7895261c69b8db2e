//! This server backs a word-frequency dashboard over the historical
//! Finnish newspapers digitized by the National Library of Finland. The
//! frequency tables it serves come from the Grand Duchy corpus
//! processing, whose products you can find at
//! <https://github.com/AnttiHaerkoenen/grand_duchy>.

use anyhow::Context;
use sanomat::{
    config::{Args, Config},
    dataset::loader,
    kwic::store::{PgSnippetStore, SnippetStore},
    server::{self, AppContext},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Determine ambient configuration and set up logging
    dotenvy::dotenv().ok();
    setup_logging();

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let database_url = std::env::var("DATABASE_URL").ok();
    let config = Config::new(args, database_url);

    // Fetch the frequency dataset, without which there is nothing to serve
    info!(data_dir = &*config.data_dir, "loading the frequency tables");
    let client = reqwest::Client::new();
    let tables = loader::load(config.clone(), client)
        .await
        .context("loading the frequency dataset")?;

    // Set up the snippet store, if one is configured
    let store = match &config.database_url {
        Some(url) => Some(Arc::new(PgSnippetStore::connect(url)?) as Arc<dyn SnippetStore>),
        None => {
            info!("DATABASE_URL is not set, keyword-in-context lookups are disabled");
            None
        }
    };

    // Wire the shared state and the API routes together
    let context = AppContext::new(tables, store, config.kwic_cache_capacity);
    let router = server::build_router(context);

    // Serve until told to stop
    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding to {address}"))?;
    info!(%address, "serving the dashboard API");
    axum::serve(listener, router)
        .await
        .context("serving the dashboard API")?;
    Ok(())
}

/// Set up logging
///
/// The filter can be adjusted through `RUST_LOG`, and defaults to
/// info-level messages.
fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
