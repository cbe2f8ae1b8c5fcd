//! SQLite output sink
//!
//! Writes each batch into an `articles` table inside a single transaction.
//! The connection is opened per batch and dropped afterwards.

use crate::article::ArticleRecord;
use crate::output::traits::{OutputResult, RecordSink};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the output database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    time TEXT NOT NULL,
    author TEXT NOT NULL,
    content TEXT NOT NULL,
    tags TEXT NOT NULL,
    harvested_at TEXT NOT NULL
);
"#;

/// Append-only SQLite table
#[derive(Debug, Clone)]
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    /// Creates a sink writing to the database at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> OutputResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(conn)
    }
}

impl RecordSink for SqliteSink {
    fn append_rows(&mut self, records: &[ArticleRecord]) -> OutputResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO articles (title, time, author, content, tags, harvested_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.title,
                    record.time,
                    record.author,
                    record.content,
                    record.tags,
                    now
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
