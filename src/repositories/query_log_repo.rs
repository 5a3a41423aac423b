use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// One row per distinct query string, exact match, case-sensitive.
#[derive(Debug, Clone)]
pub struct QueryLogRecord {
    pub id: String,
    pub query: String,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QueryLogRepo {
    path: PathBuf,
}

impl QueryLogRepo {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create query log directory: {}", parent.display())
                })?;
            }
        }
        let repo = Self { path };
        repo.init()?;
        Ok(repo)
    }

    fn init(&self) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS query_log (
                id TEXT PRIMARY KEY,
                query TEXT NOT NULL UNIQUE,
                count INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_query_log_updated ON query_log(updated_at);",
        )?;
        Ok(())
    }

    /// Records one occurrence of `query`. A single atomic statement: first
    /// occurrence inserts with count 1, any later occurrence of the
    /// identical string increments the existing row and refreshes
    /// updated_at. Two concurrent identical queries therefore cannot
    /// produce two rows or lose an increment.
    pub fn record(&self, query: &str) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        let now = Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO query_log (id, query, count, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?3)
             ON CONFLICT(query) DO UPDATE SET
                count = count + 1,
                updated_at = excluded.updated_at",
            params![Uuid::new_v4().to_string(), query, now],
        )?;
        Ok(())
    }

    pub fn get(&self, query: &str) -> Result<Option<QueryLogRecord>> {
        let conn = Connection::open(&self.path)?;
        let record = conn
            .query_row(
                "SELECT id, query, count, created_at, updated_at
                 FROM query_log WHERE query = ?1",
                params![query],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        Ok(record.map(|(id, query, count, created_at, updated_at)| QueryLogRecord {
            id,
            query,
            count,
            created_at: millis_to_datetime(created_at),
            updated_at: millis_to_datetime(updated_at),
        }))
    }

    /// Query strings ordered by most recently updated first.
    pub fn recent(&self, limit: usize) -> Result<Vec<String>> {
        let conn = Connection::open(&self.path)?;
        let mut stmt = conn.prepare(
            "SELECT query FROM query_log ORDER BY updated_at DESC, count DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;
        let mut queries = Vec::new();
        for row in rows {
            queries.push(row?);
        }
        Ok(queries)
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(|| Utc.timestamp_millis_opt(0).single().unwrap())
}
