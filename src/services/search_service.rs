use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::config::SearchSettings;
use crate::utils::normalize_link;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub summary: Option<String>,
    pub results: Vec<SearchResult>,
}

/// Every failure mode of the gateway. The display strings are the exact
/// user-facing diagnostics; handlers render them verbatim, so nothing here
/// ever propagates further up as a fault.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("検索クエリを入力してください。")]
    EmptyQuery,
    #[error("エラー: 検索クライアントが利用できません。アプリケーションを再起動してください。")]
    Unavailable,
    #[error("検索中にAPIエラーが発生しました: {message}\n権限不足の可能性があります。Vertex AI APIの有効化やサービスアカウントのロールを確認してください。設定値 ({project}, {location}, {target}) も確認してください。")]
    PermissionDenied {
        message: String,
        project: String,
        location: String,
        target: String,
    },
    #[error("検索中にAPIエラーが発生しました: {message}\n検索エンジンが見つからない可能性があります。設定値 ({project}, {location}, {target}) を確認してください。")]
    EngineNotFound {
        message: String,
        project: String,
        location: String,
        target: String,
    },
    #[error("検索中にAPIエラーが発生しました: {message}\nリクエスト内容や設定を確認してください。")]
    Backend { status: u16, message: String },
    #[error("検索中にAPIエラーが発生しました: {message}\nリクエスト内容や設定を確認してください。")]
    Transport { message: String },
    #[error("予期せぬエラーが発生しました: {0}")]
    Unexpected(String),
}

// ============================================
// Backend wire types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchApiRequest {
    query: String,
    page_size: u32,
    content_search_spec: ContentSearchSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentSearchSpec {
    snippet_spec: SnippetSpec,
    summary_spec: SummarySpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnippetSpec {
    return_snippet: bool,
    max_snippet_count: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarySpec {
    summary_result_count: u32,
    include_citations: bool,
}

/// Gateway to the Vertex AI Search backend.
#[derive(Clone)]
pub struct SearchService {
    client: Option<Client>,
    settings: SearchSettings,
}

impl SearchService {
    /// Builds the gateway. A client construction failure leaves the service
    /// in degraded mode: the process still starts and every search returns
    /// a fixed unavailable message.
    pub fn new(settings: SearchSettings) -> Self {
        let client = match Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to initialize search client: {}", e);
                None
            }
        };
        Self { client, settings }
    }

    /// Executes one search. Empty and whitespace-only queries short-circuit
    /// before any network activity.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let client = self.client.as_ref().ok_or(SearchError::Unavailable)?;

        let url = format!(
            "{}/v1beta/{}:search",
            self.settings.base_url,
            self.settings.serving_config()
        );
        let body = SearchApiRequest {
            query: trimmed.to_string(),
            page_size: self.settings.page_size,
            content_search_spec: ContentSearchSpec {
                snippet_spec: SnippetSpec {
                    return_snippet: true,
                    max_snippet_count: 1,
                },
                summary_spec: SummarySpec {
                    summary_result_count: self.settings.summary_result_count,
                    include_citations: true,
                },
            },
        };

        let mut request = client.post(&url).json(&body);
        if let Some(token) = &self.settings.access_token {
            request = request.bearer_auth(token);
        }

        // Timeouts and connection failures are backend transport errors and
        // classify as "other", not as unexpected faults.
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                SearchError::Transport {
                    message: e.to_string(),
                }
            } else {
                SearchError::Unexpected(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(self.classify_status(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Unexpected(e.to_string()))?;

        Ok(parse_response(&payload))
    }

    /// Full pipeline used by both front-end surfaces: search, then render.
    /// Always produces a displayable string, content or diagnostic.
    pub async fn search_markdown(&self, query: &str) -> String {
        match self.search(query).await {
            Ok(response) => crate::utils::render_markdown(&response),
            Err(e) => e.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    fn classify_status(&self, status: StatusCode, body: String) -> SearchError {
        let message = extract_error_message(&body);
        match status {
            StatusCode::FORBIDDEN => SearchError::PermissionDenied {
                message,
                project: self.settings.project_id.clone(),
                location: self.settings.location.clone(),
                target: self.settings.target.id().to_string(),
            },
            StatusCode::NOT_FOUND => SearchError::EngineNotFound {
                message,
                project: self.settings.project_id.clone(),
                location: self.settings.location.clone(),
                target: self.settings.target.id().to_string(),
            },
            _ => SearchError::Backend {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

/// Maps the backend payload into the normalized response, preserving the
/// backend's relevance ordering.
fn parse_response(payload: &Value) -> SearchResponse {
    let summary = payload
        .get("summary")
        .and_then(|s| s.get("summaryText"))
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string());

    let results = payload
        .get("results")
        .and_then(|r| r.as_array())
        .map(|items| items.iter().map(parse_result).collect())
        .unwrap_or_default();

    SearchResponse { summary, results }
}

fn parse_result(item: &Value) -> SearchResult {
    let data = item
        .get("document")
        .and_then(|doc| doc.get("derivedStructData"));

    let title = data
        .and_then(|d| d.get("title"))
        .and_then(|t| t.as_str())
        .unwrap_or("タイトルなし")
        .to_string();

    let link = data
        .and_then(|d| d.get("link"))
        .and_then(|l| l.as_str())
        .map(normalize_link)
        .unwrap_or_default();

    let snippet = data
        .and_then(|d| d.get("snippets"))
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
        .and_then(|s| s.get("snippet"))
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());

    SearchResult {
        title,
        link,
        snippet,
    }
}
