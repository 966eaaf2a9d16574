use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::traits::CorpusStore;

/// SQLite-backed corpus
pub struct SqliteCorpus {
    conn: Mutex<Connection>,
}

impl SqliteCorpus {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let db = Self { conn: Mutex::new(conn) };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS lines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                speaker TEXT NOT NULL,
                channel TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_lines_speaker_channel ON lines(speaker, channel)",
            [],
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))
    }
}

impl CorpusStore for SqliteCorpus {
    fn append(&self, speaker: &str, channel: &str, text: &str) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO lines (speaker, channel, text) VALUES (?1, ?2, ?3)",
            rusqlite::params![speaker, channel, text],
        )?;
        Ok(())
    }

    fn random_line(&self, speaker: &str, channel: &str) -> Result<Option<String>, StorageError> {
        let line = self
            .conn()?
            .query_row(
                "SELECT text FROM lines WHERE speaker = ?1 AND channel = ?2
                 ORDER BY RANDOM() LIMIT 1",
                rusqlite::params![speaker, channel],
                |row| row.get(0),
            )
            .optional()?;
        Ok(line)
    }

    fn random_line_matching(
        &self,
        speaker: &str,
        channel: &str,
        pattern: &str,
    ) -> Result<Option<String>, StorageError> {
        let line = self
            .conn()?
            .query_row(
                "SELECT text FROM lines WHERE speaker = ?1 AND channel = ?2 AND text LIKE ?3
                 ORDER BY RANDOM() LIMIT 1",
                rusqlite::params![speaker, channel, pattern],
                |row| row.get(0),
            )
            .optional()?;
        Ok(line)
    }

    fn line_count(&self, speaker: &str) -> Result<u64, StorageError> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM lines WHERE speaker = ?1",
            [speaker],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn lines_by(&self, speaker: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT text FROM lines WHERE speaker = ?1 ORDER BY id")?;
        let rows = stmt.query_map([speaker], |row| row.get::<_, String>(0))?;

        let mut lines = Vec::new();
        for line in rows {
            lines.push(line?);
        }
        Ok(lines)
    }

    fn total_lines(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM lines", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn speakers(&self) -> Result<Vec<(String, u64)>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT speaker, COUNT(*) FROM lines GROUP BY speaker ORDER BY speaker",
        )?;
        let rows = stmt.query_map([], |row| {
            let speaker: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((speaker, count as u64))
        })?;

        let mut speakers = Vec::new();
        for speaker in rows {
            speakers.push(speaker?);
        }
        Ok(speakers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::store::DIRECTED_PATTERN;

    #[test]
    fn test_append_and_random_line() {
        let db = SqliteCorpus::in_memory().unwrap();
        db.append("alice", "#x", "hello everyone").unwrap();

        assert_eq!(db.random_line("alice", "#x").unwrap().as_deref(), Some("hello everyone"));
        assert_eq!(db.random_line("alice", "#y").unwrap(), None);
        assert_eq!(db.random_line("bob", "#x").unwrap(), None);
    }

    #[test]
    fn test_random_line_matching_uses_like() {
        let db = SqliteCorpus::in_memory().unwrap();
        db.append("alice", "#x", "no colon here").unwrap();
        assert_eq!(db.random_line_matching("alice", "#x", DIRECTED_PATTERN).unwrap(), None);

        db.append("alice", "#x", "bob: are you there").unwrap();
        for _ in 0..10 {
            assert_eq!(
                db.random_line_matching("alice", "#x", DIRECTED_PATTERN).unwrap().as_deref(),
                Some("bob: are you there")
            );
        }
    }

    #[test]
    fn test_counts_and_speakers() {
        let db = SqliteCorpus::in_memory().unwrap();
        db.append("bob", "#x", "one").unwrap();
        db.append("alice", "#x", "two").unwrap();
        db.append("alice", "#y", "three").unwrap();

        assert_eq!(db.line_count("alice").unwrap(), 2);
        assert_eq!(db.line_count("carol").unwrap(), 0);
        assert_eq!(db.total_lines().unwrap(), 3);
        assert_eq!(db.lines_by("alice").unwrap(), vec!["two", "three"]);
        assert_eq!(
            db.speakers().unwrap(),
            vec![("alice".to_string(), 2), ("bob".to_string(), 1)]
        );
    }

    #[test]
    fn test_corpus_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.db");
        {
            let db = SqliteCorpus::open(&path).unwrap();
            db.append("alice", "#x", "persisted").unwrap();
        }
        let db = SqliteCorpus::open(&path).unwrap();
        assert_eq!(db.random_line("alice", "#x").unwrap().as_deref(), Some("persisted"));
    }
}
