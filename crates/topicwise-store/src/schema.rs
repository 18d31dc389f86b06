//! Database schema SQL for the content history.

/// Tracked content table. `generated_at` is epoch milliseconds (UTC).
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS generated_content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    unique_id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    topic TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty TEXT NOT NULL DEFAULT 'beginner',
    topic_keywords_json TEXT NOT NULL DEFAULT '[]',
    generated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_content_category ON generated_content(category);
CREATE INDEX IF NOT EXISTS idx_content_generated_at ON generated_content(generated_at);
CREATE INDEX IF NOT EXISTS idx_content_topic ON generated_content(topic);
"#;
