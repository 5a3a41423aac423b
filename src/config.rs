use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchSettings,
    pub query_log: QueryLogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Which serving config the backend request is addressed to. Vertex AI
/// Search exposes the same search operation on engines and on bare data
/// stores, with slightly different resource paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchTarget {
    Engine(String),
    DataStore(String),
}

impl SearchTarget {
    pub fn id(&self) -> &str {
        match self {
            SearchTarget::Engine(id) => id,
            SearchTarget::DataStore(id) => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub project_id: String,
    pub location: String,
    pub target: SearchTarget,
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub summary_result_count: u32,
}

impl SearchSettings {
    /// Full resource name of the serving config search requests are sent to.
    pub fn serving_config(&self) -> String {
        let prefix = format!(
            "projects/{}/locations/{}/collections/default_collection",
            self.project_id, self.location
        );
        match &self.target {
            SearchTarget::Engine(id) => format!(
                "{}/engines/{}/servingConfigs/default_serving_config",
                prefix, id
            ),
            SearchTarget::DataStore(id) => {
                format!("{}/dataStores/{}/servingConfigs/default_config", prefix, id)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogSettings {
    /// Path of the sqlite database backing the query log. Empty disables
    /// logging entirely.
    pub sqlite_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let project_id = env::var("PROJECT_ID")
            .context("PROJECT_ID is required (Google Cloud project of the search engine)")?;

        let target = match (env::var("ENGINE_ID").ok(), env::var("DATA_STORE_ID").ok()) {
            (Some(id), None) => SearchTarget::Engine(id),
            (None, Some(id)) => SearchTarget::DataStore(id),
            (Some(_), Some(_)) => {
                bail!("Set only one of ENGINE_ID and DATA_STORE_ID, not both")
            }
            (None, None) => bail!("Either ENGINE_ID or DATA_STORE_ID is required"),
        };

        let mut config = Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: num_cpus::get(),
            },
            search: SearchSettings {
                project_id,
                location: env::var("LOCATION").unwrap_or_else(|_| "global".to_string()),
                target,
                base_url: "https://discoveryengine.googleapis.com".to_string(),
                access_token: env::var("GOOGLE_ACCESS_TOKEN").ok(),
                timeout_seconds: 30,
                page_size: 5,
                summary_result_count: 3,
            },
            query_log: QueryLogSettings {
                sqlite_path: env::var("QUERY_LOG_PATH")
                    .unwrap_or_else(|_| "data/query_log.db".to_string()),
            },
        };

        // Server configuration
        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port.parse()?;
        }
        if let Ok(workers) = env::var("WORKERS") {
            config.server.workers = workers.parse()?;
        }

        // Search configuration
        if let Ok(base_url) = env::var("SEARCH_BASE_URL") {
            config.search.base_url = base_url;
        }
        if let Ok(timeout) = env::var("SEARCH_TIMEOUT_SECONDS") {
            config.search.timeout_seconds = timeout.parse()?;
        }
        if let Ok(page_size) = env::var("SEARCH_PAGE_SIZE") {
            config.search.page_size = page_size.parse()?;
        }
        if let Ok(count) = env::var("SUMMARY_RESULT_COUNT") {
            config.search.summary_result_count = count.parse()?;
        }

        Ok(config)
    }
}
