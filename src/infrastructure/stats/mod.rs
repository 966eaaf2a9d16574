//! Per-user statistics over the corpus

use std::collections::HashMap;

use crate::application::errors::{StatError, StorageError};
use crate::domain::traits::CorpusStore;

/// A metric over one nick's corpus. `None` means the nick has no data.
pub type MetricFn = fn(&dyn CorpusStore, &str) -> Result<Option<f64>, StorageError>;

/// Static registry of named metrics
#[derive(Clone)]
pub struct StatEngine {
    metrics: HashMap<&'static str, MetricFn>,
}

impl StatEngine {
    /// Empty engine, populate with `with_metric`
    pub fn empty() -> Self {
        Self {
            metrics: HashMap::new(),
        }
    }

    /// The metrics the bot ships with
    pub fn standard() -> Self {
        Self::empty()
            .with_metric("stats", line_count)
            .with_metric("pretentious", pretentiousness)
            .with_metric("percentlol", percent_lol)
            .with_metric("spammy", spamminess)
    }

    pub fn with_metric(mut self, name: &'static str, metric: MetricFn) -> Self {
        self.metrics.insert(name, metric);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    pub fn compute(
        &self,
        name: &str,
        corpus: &dyn CorpusStore,
        nick: &str,
    ) -> Result<Option<f64>, StatError> {
        let metric = self
            .metrics
            .get(name)
            .ok_or_else(|| StatError::UnknownMetric(name.to_string()))?;
        Ok(metric(corpus, nick)?)
    }
}

impl Default for StatEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a score the way it reads in chat: whole numbers keep one decimal.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn line_count(corpus: &dyn CorpusStore, nick: &str) -> Result<Option<f64>, StorageError> {
    Ok(Some(corpus.line_count(nick)? as f64))
}

/// Mean word length
fn pretentiousness(corpus: &dyn CorpusStore, nick: &str) -> Result<Option<f64>, StorageError> {
    let mut words = 0usize;
    let mut chars = 0usize;
    for line in corpus.lines_by(nick)? {
        for word in line.split_whitespace() {
            words += 1;
            chars += word.chars().count();
        }
    }
    if words == 0 {
        return Ok(None);
    }
    Ok(Some(chars as f64 / words as f64))
}

/// Percentage of lines containing "lol"
fn percent_lol(corpus: &dyn CorpusStore, nick: &str) -> Result<Option<f64>, StorageError> {
    let lines = corpus.lines_by(nick)?;
    if lines.is_empty() {
        return Ok(None);
    }
    let lols = lines
        .iter()
        .filter(|l| l.to_lowercase().contains("lol"))
        .count();
    Ok(Some(100.0 * lols as f64 / lines.len() as f64))
}

/// Share of everything recorded, in percent
fn spamminess(corpus: &dyn CorpusStore, nick: &str) -> Result<Option<f64>, StorageError> {
    let mine = corpus.line_count(nick)?;
    let total = corpus.total_lines()?;
    if mine == 0 || total == 0 {
        return Ok(None);
    }
    Ok(Some(100.0 * mine as f64 / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryCorpus;

    fn corpus() -> MemoryCorpus {
        let corpus = MemoryCorpus::with_seed(11);
        corpus.append("alice", "#x", "lol that is funny").unwrap();
        corpus.append("alice", "#x", "indubitably").unwrap();
        corpus.append("bob", "#x", "LOL").unwrap();
        corpus.append("bob", "#y", "ok").unwrap();
        corpus
    }

    #[test]
    fn test_unknown_metric_is_typed_failure() {
        let engine = StatEngine::standard();
        let err = engine.compute("verbosity", &corpus(), "alice").unwrap_err();
        assert!(matches!(err, StatError::UnknownMetric(ref name) if name == "verbosity"));
    }

    #[test]
    fn test_line_count() {
        let engine = StatEngine::standard();
        assert_eq!(engine.compute("stats", &corpus(), "alice").unwrap(), Some(2.0));
        assert_eq!(engine.compute("stats", &corpus(), "nobody").unwrap(), Some(0.0));
    }

    #[test]
    fn test_pretentiousness_is_mean_word_length() {
        let engine = StatEngine::standard();
        // lol(3) that(4) is(2) funny(5) indubitably(11) = 25 / 5
        assert_eq!(engine.compute("pretentious", &corpus(), "alice").unwrap(), Some(5.0));
        assert_eq!(engine.compute("pretentious", &corpus(), "nobody").unwrap(), None);
    }

    #[test]
    fn test_percent_lol_ignores_case() {
        let engine = StatEngine::standard();
        assert_eq!(engine.compute("percentlol", &corpus(), "alice").unwrap(), Some(50.0));
        assert_eq!(engine.compute("percentlol", &corpus(), "bob").unwrap(), Some(50.0));
    }

    #[test]
    fn test_spamminess_is_share_of_corpus() {
        let engine = StatEngine::standard();
        assert_eq!(engine.compute("spammy", &corpus(), "bob").unwrap(), Some(50.0));
        assert_eq!(engine.compute("spammy", &corpus(), "nobody").unwrap(), None);
    }

    #[test]
    fn test_custom_metric() {
        fn constant(_: &dyn CorpusStore, _: &str) -> Result<Option<f64>, StorageError> {
            Ok(Some(1.5))
        }
        let engine = StatEngine::empty().with_metric("constant", constant);
        assert!(engine.contains("constant"));
        assert!(!engine.contains("stats"));
        assert_eq!(engine.compute("constant", &corpus(), "x").unwrap(), Some(1.5));
    }

    #[test]
    fn test_round_and_format() {
        assert_eq!(round2(2.256), 2.26);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(format_score(3.0), "3.0");
        assert_eq!(format_score(2.25), "2.25");
        assert_eq!(format_score(33.33), "33.33");
    }
}
