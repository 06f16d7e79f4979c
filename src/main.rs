use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sphere_match::config::{LoggingSettings, Settings};
use sphere_match::core::{CompatibilityScorer, SystemClock};
use sphere_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use sphere_match::services::{HttpOracle, OracleScoreCache, PostgresStore, TracingNotifier};

/// `LOG_LEVEL`/`LOG_FORMAT` override the `[logging]` section; `RUST_LOG` overrides both
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_scorer(settings: &Settings) -> CompatibilityScorer {
    if !settings.oracle.enabled {
        info!("Compatibility oracle disabled, scoring on interests only");
        return CompatibilityScorer::interests_only();
    }

    match HttpOracle::from_settings(&settings.oracle) {
        Ok(oracle) => {
            info!(
                "Compatibility oracle enabled ({}, timeout {}ms)",
                settings.oracle.endpoint, settings.oracle.timeout_ms
            );
            let cache = OracleScoreCache::new(settings.oracle.cache_size, settings.oracle.cache_ttl_secs);
            CompatibilityScorer::with_oracle(
                Arc::new(oracle),
                Duration::from_millis(settings.oracle.timeout_ms),
            )
            .with_cache(cache)
        }
        Err(e) => {
            warn!("Failed to build compatibility oracle ({}), scoring on interests only", e);
            CompatibilityScorer::interests_only()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    match &settings {
        Ok(s) => init_logging(&s.logging),
        Err(_) => init_logging(&LoggingSettings::default()),
    }

    info!("Starting Sphere matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let store = PostgresStore::from_settings(&settings.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

    info!("PostgreSQL store initialized (max: {} connections)", settings.database.max_connections);

    let app_state = AppState::new(
        Arc::new(store),
        build_scorer(&settings),
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
        &settings,
    );

    info!(
        "Economy: undo {} coins, welcome bonus {}, {} super like(s)/day; feed ranking {:?}",
        settings.economy.undo_cost,
        settings.economy.welcome_bonus,
        settings.economy.daily_super_likes,
        settings.feed.ranking
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
