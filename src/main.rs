use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use gigmatch::config::{LoggingSettings, Settings};
use gigmatch::core::Matcher;
use gigmatch::models::ScoringWeights;
use gigmatch::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use gigmatch::services::{schedule, MatchGenerator, MatchStore, PostgresClient};
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging. `LOG_LEVEL` / `LOG_FORMAT` override the config file,
/// and `RUST_LOG` overrides both for filtering.
fn init_tracing(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting gigmatch matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        io::Error::new(io::ErrorKind::Other, format!("PostgreSQL connection error: {}", e))
    })?;

    let store: Arc<dyn MatchStore> = Arc::new(postgres);

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    let matcher = Matcher::new();

    info!("Matcher initialized with weights: {:?}", ScoringWeights::default());

    let generator = Arc::new(MatchGenerator::new(
        Arc::clone(&store),
        matcher,
        settings.cache.roster_ttl(),
        settings.matching.sweep_concurrency,
    ));

    if settings.matching.cron_secret.is_none() {
        info!("No matching.cron_secret configured; sweep trigger endpoints will reject all requests");
    }

    let shutdown = CancellationToken::new();
    let sweep_job = settings.matching.sweep_interval().map(|every| {
        actix_web::rt::spawn(schedule::run(Arc::clone(&generator), every, shutdown.clone()))
    });

    let app_state = AppState {
        store,
        generator,
        cron_secret: settings.matching.cron_secret.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let result = HttpServer::new(move || {
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
    .await;

    shutdown.cancel();
    if let Some(job) = sweep_job {
        if let Err(e) = job.await {
            error!("Scheduled sweep task ended abnormally: {}", e);
        }
    }

    info!("Server stopped");
    result
}
