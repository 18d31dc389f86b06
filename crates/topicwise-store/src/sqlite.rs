//! SQLite-backed content history.
//!
//! One table, one row per tracked piece of content. Every read is a single
//! query, so a caller always sees a consistent point-in-time window even
//! while another request is recording new content.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::history::{ContentHistoryStore, HistoryStats};
use crate::schema::SCHEMA_SQL;
use topicwise_core::{window_start, ContentRecord, Difficulty, Error, NewContent, Result};
use topicwise_extract::extract_keywords;

/// SQLite store of generated content.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteHistory {
    /// Open or create the history database.
    ///
    /// `db_dir` is the directory (e.g., `data/history/`). The file will be `db_dir/topicwise.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("topicwise.db");

        let conn = Self::create_connection(&db_path)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteHistory initialized: {} records, path={}",
            store.count()?,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    /// Look up a record by its unique id.
    pub fn get(&self, unique_id: &str) -> Result<Option<ContentRecord>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM generated_content WHERE unique_id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![unique_id], |row| Ok(Self::row_to_record(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    pub fn stats(&self) -> Result<HistoryStats> {
        let total_records = self.count()?;
        let db_size = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);
        Ok(HistoryStats {
            total_records,
            backend: "sqlite",
            db_path: Some(self.db_path.to_string_lossy().to_string()),
            db_size_mb: Some(db_size as f64 / (1024.0 * 1024.0)),
        })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> ContentRecord {
        let keywords: BTreeSet<String> = row
            .get::<_, String>("topic_keywords_json")
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        let difficulty = row
            .get::<_, String>("difficulty")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Difficulty::Beginner);
        let millis: i64 = row.get("generated_at").unwrap_or(0);

        ContentRecord {
            title: row.get("title").unwrap_or_default(),
            topic: row.get("topic").unwrap_or_default(),
            category: row.get("category").unwrap_or_default(),
            difficulty,
            topic_keywords: keywords,
            generated_at: from_millis(millis),
            unique_id: row.get("unique_id").unwrap_or_default(),
        }
    }
}

impl ContentHistoryStore for SqliteHistory {
    fn recent(&self, days: i64) -> Result<Vec<ContentRecord>> {
        let now = Utc::now();
        let cutoff = window_start(days, now).timestamp_millis();
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM generated_content
                 WHERE generated_at >= ?1 AND generated_at <= ?2
                 ORDER BY generated_at DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![cutoff, now.timestamp_millis()], |row| Ok(Self::row_to_record(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn record(&self, content: NewContent) -> Result<ContentRecord> {
        let keywords = extract_keywords(&content.topic);
        let record = ContentRecord::new(content, keywords);
        let keywords_json = serde_json::to_string(&record.topic_keywords)?;

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO generated_content
                (unique_id, title, topic, category, difficulty, topic_keywords_json, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .insert(params![
            record.unique_id,
            record.title,
            record.topic,
            record.category,
            record.difficulty.as_str(),
            keywords_json,
            record.generated_at.timestamp_millis(),
        ])
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                Error::DuplicateContent(record.unique_id.clone())
            } else {
                Error::Database(e.to_string())
            }
        })?;

        debug!("Recorded content {} in {}", record.unique_id, record.category);
        Ok(record)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM generated_content", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count.max(0) as usize)
    }

    fn usage_count(&self, category: &str, days: i64) -> Result<usize> {
        let now = Utc::now();
        let cutoff = window_start(days, now).timestamp_millis();
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM generated_content
                 WHERE category = ?1 AND generated_at >= ?2 AND generated_at <= ?3",
                params![category, cutoff, now.timestamp_millis()],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count.max(0) as usize)
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}
