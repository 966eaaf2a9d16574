//! In-memory corpus implementation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, RwLock};

use crate::domain::traits::CorpusStore;
use crate::application::errors::StorageError;

#[derive(Debug, Clone)]
struct StoredLine {
    speaker: String,
    channel: String,
    text: String,
}

/// Volatile corpus kept in process memory
pub struct MemoryCorpus {
    lines: RwLock<Vec<StoredLine>>,
    rng: Mutex<StdRng>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic random selection, for tests
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            lines: RwLock::new(Vec::new()),
            rng: Mutex::new(rng),
        }
    }

    fn pick<F>(&self, predicate: F) -> Result<Option<String>, StorageError>
    where
        F: Fn(&StoredLine) -> bool,
    {
        let lines = self.lines.read().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let candidates: Vec<&StoredLine> = lines.iter().filter(|l| predicate(*l)).collect();

        let mut rng = self.rng.lock().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(candidates.choose(&mut *rng).map(|l| l.text.clone()))
    }
}

impl Default for MemoryCorpus {
    fn default() -> Self {
        Self::new()
    }
}

/// SQL `LIKE` matching restricted to the `%` wildcard
pub fn like_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) {
        return false;
    }
    let mut rest = &text[first.len()..];
    if rest.len() < last.len() || !rest.ends_with(last) {
        return false;
    }
    rest = &rest[..rest.len() - last.len()];

    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    true
}

impl CorpusStore for MemoryCorpus {
    fn append(&self, speaker: &str, channel: &str, text: &str) -> Result<(), StorageError> {
        let mut lines = self.lines.write().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        lines.push(StoredLine {
            speaker: speaker.to_string(),
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn random_line(&self, speaker: &str, channel: &str) -> Result<Option<String>, StorageError> {
        self.pick(|l| l.speaker == speaker && l.channel == channel)
    }

    fn random_line_matching(
        &self,
        speaker: &str,
        channel: &str,
        pattern: &str,
    ) -> Result<Option<String>, StorageError> {
        self.pick(|l| l.speaker == speaker && l.channel == channel && like_match(pattern, &l.text))
    }

    fn line_count(&self, speaker: &str) -> Result<u64, StorageError> {
        let lines = self.lines.read().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(lines.iter().filter(|l| l.speaker == speaker).count() as u64)
    }

    fn lines_by(&self, speaker: &str) -> Result<Vec<String>, StorageError> {
        let lines = self.lines.read().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(lines
            .iter()
            .filter(|l| l.speaker == speaker)
            .map(|l| l.text.clone())
            .collect())
    }

    fn total_lines(&self) -> Result<u64, StorageError> {
        let lines = self.lines.read().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(lines.len() as u64)
    }

    fn speakers(&self) -> Result<Vec<(String, u64)>, StorageError> {
        let lines = self.lines.read().map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let mut counts: std::collections::BTreeMap<&str, u64> = std::collections::BTreeMap::new();
        for line in lines.iter() {
            *counts.entry(line.speaker.as_str()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().map(|(s, c)| (s.to_string(), c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_match() {
        assert!(like_match("%:%", "bob: hi"));
        assert!(like_match("%:%", ":"));
        assert!(!like_match("%:%", "no colon"));
        assert!(like_match("bob%", "bob: hi"));
        assert!(!like_match("bob%", "alice: hi"));
        assert!(like_match("%hi", "bob: hi"));
        assert!(like_match("a%b%c", "a-b-c"));
        assert!(!like_match("a%b%c", "a-c-b"));
        assert!(like_match("exact", "exact"));
        assert!(!like_match("exact", "exactly"));
        assert!(!like_match("ab%ba", "aba"));
    }

    #[test]
    fn test_random_line_scoped_to_speaker_and_channel() {
        let corpus = MemoryCorpus::with_seed(7);
        corpus.append("alice", "#x", "hello everyone").unwrap();
        corpus.append("alice", "#y", "elsewhere").unwrap();

        assert_eq!(corpus.random_line("alice", "#x").unwrap().as_deref(), Some("hello everyone"));
        assert_eq!(corpus.random_line("bob", "#x").unwrap(), None);
    }

    #[test]
    fn test_random_line_covers_all_candidates() {
        let corpus = MemoryCorpus::with_seed(1);
        corpus.append("alice", "#x", "one").unwrap();
        corpus.append("alice", "#x", "two").unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(corpus.random_line("alice", "#x").unwrap().unwrap());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_speakers_sorted_with_counts() {
        let corpus = MemoryCorpus::with_seed(3);
        corpus.append("carol", "#x", "a").unwrap();
        corpus.append("alice", "#x", "b").unwrap();
        corpus.append("carol", "#y", "c").unwrap();

        assert_eq!(
            corpus.speakers().unwrap(),
            vec![("alice".to_string(), 1), ("carol".to_string(), 2)]
        );
        assert_eq!(corpus.total_lines().unwrap(), 3);
        assert_eq!(corpus.lines_by("carol").unwrap(), vec!["a", "c"]);
    }
}
