//! `inventoryd` — the inventory server binary.
//!
//! Usage:
//!   inventoryd [--data-dir PATH] [--sqlite PATH] [--listen ADDR] [--cors-origin ORIGIN]...
//!
//! The SQLite database defaults to `{data_dir}/data.sqlite`.

mod cors;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use inventory_core::Module;
use tracing::info;

/// Inventory management server.
#[derive(Parser, Debug)]
#[command(name = "inventoryd", about = "Inventory management server")]
struct Cli {
    /// Directory for persistent data.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Path to the SQLite database file (overrides {data_dir}/data.sqlite).
    #[arg(long = "sqlite")]
    sqlite: Option<PathBuf>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Allowed CORS origin (repeatable). Defaults to any origin.
    #[arg(long = "cors-origin")]
    cors_origin: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = inventory_core::ServiceConfig {
        data_dir: cli.data_dir,
        sqlite_path: cli.sqlite,
        listen: cli.listen,
        ..Default::default()
    };
    if !cli.cors_origin.is_empty() {
        config.cors_origins = cli.cors_origin;
    }

    if let Some(dir) = &config.data_dir {
        std::fs::create_dir_all(dir)?;
    }

    // Initialize the embedded store.
    let sqlite_path = config.resolve_sqlite_path();
    info!("Opening SQLite database at {}", sqlite_path.display());
    let sql: Arc<dyn inventory_sql::SQLStore> = Arc::new(
        inventory_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Initialize modules.
    let inventory_module = inventory::InventoryModule::new(Arc::clone(&sql))
        .map_err(|e| anyhow::anyhow!("failed to initialize inventory module: {}", e))?;
    info!("Inventory module initialized");

    let module_routes = vec![(
        inventory_module.name().to_string(),
        inventory_module.routes(),
    )];

    // Build router.
    let cors = Arc::new(cors::CorsConfig::new(config.cors_origins.clone()));
    let app = routes::build_router(module_routes, cors);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Inventory server listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
