use actix_web::{web, HttpResponse, Result};

use crate::models::{ErrorResponse, HealthResponse};
use crate::AppState;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let search_ready = state.search_service.is_ready();

    let response = HealthResponse {
        status: if search_ready { "healthy" } else { "degraded" }.to_string(),
        search_ready,
        query_log_enabled: state.query_log_service.is_enabled(),
        serving_config: state.config.search.serving_config(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn ready_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    if state.search_service.is_ready() {
        Ok(HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            search_ready: true,
            query_log_enabled: state.query_log_service.is_enabled(),
            serving_config: state.config.search.serving_config(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            "Service not ready - search client unavailable",
        )))
    }
}

pub async fn not_found() -> Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(ErrorResponse::new("Endpoint not found")))
}
