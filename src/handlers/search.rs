use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::Utc;
use validator::Validate;

use crate::models::{ErrorResponse, SearchQueryRequest, SearchQueryResponse};
use crate::AppState;

/// Web-form submit: runs the query through the search pipeline and returns
/// the rendered markdown. The query is logged only after the display text
/// is computed; a logging failure can never change what the user sees.
pub async fn search(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<SearchQueryRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Invalid request",
            format!("Validation error: {}", e),
        )));
    }

    let result = state.search_service.search_markdown(&req.query).await;

    // Empty submissions only produce the input prompt and are not logged.
    if !req.query.trim().is_empty() {
        state.query_log_service.log_query(&req.query).await;
    }

    let response = SearchQueryResponse {
        query: req.query.clone(),
        result,
        timestamp: Utc::now(),
    };
    respond(http_req, response)
}

fn respond(http_req: HttpRequest, response: SearchQueryResponse) -> Result<HttpResponse> {
    let accept = http_req
        .headers()
        .get(actix_web::http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if accept.contains("text/plain") {
        return Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(response.result));
    }

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::json;

    use crate::config::{Config, QueryLogSettings, SearchTarget, ServerConfig};
    use crate::models::SearchQueryResponse;
    use crate::routes::api;
    use crate::services::{QueryLogService, SearchService, DEFAULT_EXAMPLES};
    use crate::AppState;

    fn test_config(sqlite_path: String) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: 1,
            },
            search: crate::config::SearchSettings {
                project_id: "test-project".to_string(),
                location: "global".to_string(),
                target: SearchTarget::Engine("test-engine".to_string()),
                // Nothing listens here; non-empty queries fail fast with a
                // transport error instead of reaching a real backend.
                base_url: "http://127.0.0.1:1".to_string(),
                access_token: None,
                timeout_seconds: 1,
                page_size: 5,
                summary_result_count: 3,
            },
            query_log: QueryLogSettings { sqlite_path },
        }
    }

    fn test_state(sqlite_path: String) -> AppState {
        let config = test_config(sqlite_path);
        AppState {
            search_service: SearchService::new(config.search.clone()),
            query_log_service: QueryLogService::new(config.query_log.clone()),
            config,
            start_time: std::time::Instant::now(),
        }
    }

    fn temp_db_path() -> String {
        std::env::temp_dir()
            .join(format!("search_handler_test_{}.db", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[actix_web::test]
    async fn empty_query_prompts_and_is_not_logged() {
        let state = test_state(temp_db_path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "" }))
            .to_request();
        let body: SearchQueryResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.result, "検索クエリを入力してください。");

        // The store stayed empty, so the defaults come back.
        let recent = state.query_log_service.recent_queries(3).await;
        assert_eq!(recent, DEFAULT_EXAMPLES.map(|s| s.to_string()).to_vec());
    }

    #[actix_web::test]
    async fn backend_failure_returns_diagnostic_and_still_logs() {
        let state = test_state(temp_db_path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "Gemini の事例" }))
            .to_request();
        let body: SearchQueryResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.result.starts_with("検索中にAPIエラーが発生しました"));
        assert!(body.result.contains("リクエスト内容や設定を確認してください"));

        let recent = state.query_log_service.recent_queries(3).await;
        assert_eq!(recent, vec!["Gemini の事例".to_string()]);
    }

    #[actix_web::test]
    async fn text_plain_accept_returns_markdown_body() {
        let state = test_state(String::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .insert_header((actix_web::http::header::ACCEPT, "text/plain"))
            .set_json(json!({ "query": "  " }))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "検索クエリを入力してください。".as_bytes());
    }

    #[actix_web::test]
    async fn overlong_query_is_rejected() {
        let state = test_state(String::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(api::config()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(json!({ "query": "あ".repeat(600) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
