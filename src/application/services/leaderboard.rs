use crate::application::errors::{StatError, StorageError};
use crate::domain::entities::{BoardMode, LeaderboardEntry};
use crate::domain::traits::CorpusStore;
use crate::infrastructure::stats::{format_score, round2, StatEngine};

/// Metric that never appears on a board, even though it can be computed per user
pub const UNRANKED_METRIC: &str = "pretentious";

/// Ranks active users by a metric
#[derive(Debug, Clone)]
pub struct LeaderboardRanker {
    size: usize,
}

impl LeaderboardRanker {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Top entries for `metric`, or `None` when the metric cannot be ranked.
    /// Users without data for the metric are left off.
    pub fn rank(
        &self,
        corpus: &dyn CorpusStore,
        stats: &StatEngine,
        users: &[String],
        metric: &str,
        mode: BoardMode,
    ) -> Result<Option<Vec<LeaderboardEntry>>, StorageError> {
        if metric == UNRANKED_METRIC {
            tracing::debug!("{} is not rankable", metric);
            return Ok(None);
        }
        if !stats.contains(metric) {
            tracing::debug!("unknown metric {}", metric);
            return Ok(None);
        }

        let mut entries = Vec::with_capacity(users.len());
        for nick in users {
            match stats.compute(metric, corpus, nick) {
                Ok(Some(score)) => entries.push(LeaderboardEntry::new(nick.clone(), round2(score))),
                Ok(None) => {}
                Err(StatError::UnknownMetric(_)) => return Ok(None),
                Err(StatError::Storage(e)) => return Err(e),
            }
        }

        if mode.ascending() {
            entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        } else {
            entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        }
        entries.truncate(self.size);
        Ok(Some(entries))
    }

    /// Header line followed by one row per entry
    pub fn render(mode: BoardMode, metric: &str, entries: &[LeaderboardEntry]) -> Vec<String> {
        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(format!("{} for {}:", mode, metric));
        for entry in entries {
            lines.push(format!("{:<20}: {:>6}", entry.nick, format_score(entry.score)));
        }
        lines
    }
}

impl Default for LeaderboardRanker {
    fn default() -> Self {
        Self::new(5)
    }
}
