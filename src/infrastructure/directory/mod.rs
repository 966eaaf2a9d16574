//! Active user lookup

use crate::application::errors::StorageError;
use crate::domain::traits::CorpusStore;

/// Decides which nicks count as active
#[derive(Debug, Clone)]
pub struct UserDirectory {
    min_lines: u64,
}

impl UserDirectory {
    pub fn new(min_lines: u64) -> Self {
        Self { min_lines }
    }

    /// Speakers with at least `min_lines` recorded lines, sorted by nick
    pub fn active_users(&self, corpus: &dyn CorpusStore) -> Result<Vec<String>, StorageError> {
        let mut users: Vec<String> = corpus
            .speakers()?
            .into_iter()
            .filter(|(_, count)| *count >= self.min_lines)
            .map(|(nick, _)| nick)
            .collect();
        users.sort();
        Ok(users)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryCorpus;

    #[test]
    fn test_threshold_filters_quiet_users() {
        let corpus = MemoryCorpus::with_seed(5);
        corpus.append("bob", "#x", "one").unwrap();
        corpus.append("alice", "#x", "one").unwrap();
        corpus.append("alice", "#x", "two").unwrap();

        assert_eq!(UserDirectory::new(1).active_users(&corpus).unwrap(), vec!["alice", "bob"]);
        assert_eq!(UserDirectory::new(2).active_users(&corpus).unwrap(), vec!["alice"]);
        assert!(UserDirectory::new(3).active_users(&corpus).unwrap().is_empty());
    }
}
