use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::models::{ErrorResponse, RetrieveRequest, RetrieveResponse};
use crate::AppState;

/// Agent-tool surface: the conversational agent passes the queries it
/// distilled from the current turn. Only the first is searched; the query
/// log is the durable history, so no per-session list is kept here.
pub async fn retrieve(
    state: web::Data<AppState>,
    req: web::Json<RetrieveRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    let query = req.queries.first().map(String::as_str).unwrap_or("");
    let result = state.search_service.search_markdown(query).await;

    if !query.trim().is_empty() {
        state.query_log_service.log_query(query).await;
    }

    Ok(HttpResponse::Ok().json(RetrieveResponse {
        status: "success".to_string(),
        result,
    }))
}
