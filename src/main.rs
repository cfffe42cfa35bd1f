//! tagtunes - a self-hosted music library tagger
//!
//! Imports a user's songs from an external catalog, lets them attach their own
//! tags and browse the library by tags, albums and artists.

mod api;
mod config;
mod core;
mod db;
mod models;
mod stores;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::config::{Paths, UserConfig};
use crate::stores::{EntityStore, MemoryStore, SqliteStore};
use crate::utils::auth::TokenIssuer;

/// tagtunes - music library tagger
#[derive(Parser, Debug)]
#[command(name = "tagtunes")]
#[command(version)]
#[command(about = "A self-hosted music library tagger")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the library in memory instead of SQLite
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!("{},sqlx=warn", log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("tagtunes v{} starting...", env!("CARGO_PKG_VERSION"));

    let paths = Paths::new(args.config.clone())?;
    info!("Config directory: {:?}", paths.config_dir());

    let mut config = UserConfig::load(&paths.settings_path())?;
    config.apply_env();
    if args.mock {
        config.use_mock_data = true;
    }

    let port = config.port.unwrap_or(args.port);
    start_tagtunes(args.host, port, &paths, config).await
}

/// Pick the entity store named by the configuration
async fn open_store(paths: &Paths, config: &UserConfig) -> Result<Arc<dyn EntityStore>> {
    if config.use_mock_data {
        let store = MemoryStore::new();
        if config.seed_demo_data {
            stores::seed_demo_library(&store).await?;
        }
        info!("Using in-memory store");
        return Ok(Arc::new(store));
    }

    let url = config
        .database_url
        .clone()
        .unwrap_or_else(|| paths.database_url());
    let store = SqliteStore::connect(&url).await?;
    info!("Using SQLite store at {}", url);

    Ok(Arc::new(store))
}

async fn start_tagtunes(host: String, port: u16, paths: &Paths, config: UserConfig) -> Result<()> {
    let store = open_store(paths, &config).await?;

    let max_age_secs = u64::try_from(config.token_max_age_secs()).unwrap_or(u64::MAX);
    let state = actix_web::web::Data::new(api::AppState {
        store,
        tokens: TokenIssuer::new(&config.jwt_secret, max_age_secs),
        default_page_size: config.default_page_size,
        max_page_size: config.max_page_size,
    });

    // Start the server
    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    use actix_cors::Cors;
    use actix_web::{middleware, App, HttpServer};

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
