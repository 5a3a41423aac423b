use actix_web::{web, HttpResponse, Result};

use crate::models::ExamplesResponse;
use crate::AppState;

const EXAMPLE_COUNT: usize = 3;

/// Front-end load: example queries for the input field, most recently
/// searched first. Falls back to the fixed defaults when the log store is
/// empty or unavailable.
pub async fn examples(state: web::Data<AppState>) -> Result<HttpResponse> {
    let examples = state.query_log_service.recent_queries(EXAMPLE_COUNT).await;
    Ok(HttpResponse::Ok().json(ExamplesResponse { examples }))
}
