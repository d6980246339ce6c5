use tracing::{error, info, warn};

use gazette::auth::ensure_admin;
use gazette::ingest::IngestScheduler;
use gazette::web::WebServer;
use gazette::{Config, Database, UserRepository};

#[tokio::main]
async fn main() {
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = gazette::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        gazette::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> gazette::Result<()> {
    config.validate()?;

    info!("Gazette {}", env!("CARGO_PKG_VERSION"));

    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    if let Some(admin) = &config.admin {
        match ensure_admin(&UserRepository::new(db.pool()), admin).await {
            Ok(Some(user)) => info!(username = %user.username, "Administrator account ready"),
            Ok(None) => {}
            Err(e) => warn!("Could not bootstrap administrator: {}", e),
        }
    }

    let ingest = if config.ingest.enabled {
        let scheduler = IngestScheduler::from_config(&config.ingest, db.clone())?;
        info!(
            feed_url = %config.ingest.feed_url,
            schedule = %config.ingest.schedule,
            "Feed ingestion enabled"
        );
        if config.ingest.run_on_startup {
            scheduler.run_once().await;
        }
        Some(scheduler.spawn())
    } else {
        info!("Feed ingestion disabled");
        None
    };

    let server = WebServer::new(&config.server, db)?;
    let result = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await;

    if let Some(handle) = ingest {
        handle.shutdown().await;
    }

    result
}
