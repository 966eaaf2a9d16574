use crate::application::errors::StorageError;

/// Pattern matching lines addressed to another nick (`nick: text`)
pub const DIRECTED_PATTERN: &str = "%:%";

/// Corpus store - append-only collection of lines keyed by (speaker, channel)
///
/// Random lookups are uniform over the matching subset. Patterns use the SQL
/// `LIKE` convention where `%` matches any run of characters.
pub trait CorpusStore: Send + Sync {
    fn append(&self, speaker: &str, channel: &str, text: &str) -> Result<(), StorageError>;

    fn random_line(&self, speaker: &str, channel: &str) -> Result<Option<String>, StorageError>;

    fn random_line_matching(
        &self,
        speaker: &str,
        channel: &str,
        pattern: &str,
    ) -> Result<Option<String>, StorageError>;

    /// Lines recorded for a speaker across every channel
    fn line_count(&self, speaker: &str) -> Result<u64, StorageError>;

    fn lines_by(&self, speaker: &str) -> Result<Vec<String>, StorageError>;

    fn total_lines(&self) -> Result<u64, StorageError>;

    /// Every speaker with their line count
    fn speakers(&self) -> Result<Vec<(String, u64)>, StorageError>;
}
