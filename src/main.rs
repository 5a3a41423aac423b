mod config;
mod handlers;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use handlers::health::not_found;
use routes::api;
use services::{QueryLogService, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub search_service: SearchService,
    pub query_log_service: QueryLogService,
    pub config: Config,
    pub start_time: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing identifiers are fatal
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Starting Jirei Search Service on port {} (serving config: {})",
        config.server.port,
        config.search.serving_config()
    );

    // Both services degrade instead of failing startup: an unusable search
    // client answers with a fixed message, a missing log store no-ops.
    let search_service = SearchService::new(config.search.clone());
    let query_log_service = QueryLogService::new(config.query_log.clone());
    if !query_log_service.is_enabled() {
        info!("Query logging is disabled");
    }

    let state = AppState {
        search_service,
        query_log_service,
        config: config.clone(),
        start_time: Instant::now(),
    };

    // Create HTTP server
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(api::config())
            .default_service(web::route().to(not_found))
    })
    .bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Server started successfully at http://{}:{}",
        config.server.host, config.server.port
    );

    // Run the server
    server.workers(config.server.workers).run().await
}
