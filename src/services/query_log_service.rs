use tracing::warn;

use crate::config::QueryLogSettings;
use crate::repositories::QueryLogRepo;

/// Shown on first load and whenever the store is unreachable or empty.
pub const DEFAULT_EXAMPLES: [&str; 3] = [
    "Gemini を活用した事例",
    "BigQuery の事例",
    "ゲーム業界での生成 AI を活用した事例",
];

/// Best-effort facade over the query log. Every failure is caught here and
/// logged; nothing a caller displays ever depends on a log write or read
/// succeeding.
#[derive(Clone)]
pub struct QueryLogService {
    repo: Option<QueryLogRepo>,
}

impl QueryLogService {
    pub fn new(settings: QueryLogSettings) -> Self {
        let repo = if settings.sqlite_path.trim().is_empty() {
            None
        } else {
            match QueryLogRepo::new(settings.sqlite_path.clone()) {
                Ok(repo) => Some(repo),
                Err(e) => {
                    warn!("Query log disabled, failed to open store: {}", e);
                    None
                }
            }
        };
        Self { repo }
    }

    /// Records one occurrence of `query`, fire-and-forget.
    pub async fn log_query(&self, query: &str) {
        let Some(repo) = self.repo.clone() else {
            return;
        };
        let query = query.to_string();
        let outcome = tokio::task::spawn_blocking(move || repo.record(&query)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to record query: {}", e),
            Err(e) => warn!("Query log task panicked: {}", e),
        }
    }

    /// Most recently used query strings, newest first, at most `limit`.
    /// Substitutes the fixed default examples when the store is disabled,
    /// unreachable or empty; never raises.
    pub async fn recent_queries(&self, limit: usize) -> Vec<String> {
        let queries = match self.repo.clone() {
            Some(repo) => tokio::task::spawn_blocking(move || repo.recent(limit))
                .await
                .unwrap_or_else(|e| {
                    warn!("Query log task panicked: {}", e);
                    Ok(Vec::new())
                })
                .unwrap_or_else(|e| {
                    warn!("Failed to read recent queries: {}", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };

        if queries.is_empty() {
            DEFAULT_EXAMPLES
                .iter()
                .take(limit)
                .map(|s| s.to_string())
                .collect()
        } else {
            queries
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.repo.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_settings() -> QueryLogSettings {
        QueryLogSettings {
            sqlite_path: std::env::temp_dir()
                .join(format!("query_log_service_test_{}.db", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
        }
    }

    #[tokio::test]
    async fn disabled_store_noops_and_falls_back() {
        let service = QueryLogService::new(QueryLogSettings {
            sqlite_path: String::new(),
        });
        assert!(!service.is_enabled());

        service.log_query("Gemini の事例").await;
        let examples = service.recent_queries(3).await;
        assert_eq!(examples, DEFAULT_EXAMPLES.map(|s| s.to_string()).to_vec());
    }

    #[tokio::test]
    async fn empty_store_falls_back_to_defaults() {
        let service = QueryLogService::new(temp_settings());
        assert!(service.is_enabled());

        let examples = service.recent_queries(2).await;
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0], DEFAULT_EXAMPLES[0]);
    }

    #[tokio::test]
    async fn logged_queries_replace_defaults() {
        let service = QueryLogService::new(temp_settings());
        service.log_query("自治体の事例").await;

        let examples = service.recent_queries(3).await;
        assert_eq!(examples, vec!["自治体の事例".to_string()]);
    }

    #[tokio::test]
    async fn repeated_query_stays_one_entry() {
        let service = QueryLogService::new(temp_settings());
        service.log_query("BigQuery の事例").await;
        service.log_query("BigQuery の事例").await;
        service.log_query("BigQuery の事例").await;

        let examples = service.recent_queries(10).await;
        assert_eq!(examples, vec!["BigQuery の事例".to_string()]);
    }
}
