use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::Regex;

use crate::application::errors::StorageError;
use crate::domain::traits::store::{CorpusStore, DIRECTED_PATTERN};

static ADDRESSEE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]*):").expect("valid addressee pattern"));

/// Nick a directed line is addressed to: the text before the first colon.
///
/// Surrounding whitespace is trimmed (`"bob : hi"` addresses `bob`), and an
/// empty addressee (`": hi"`) counts as no match so the caller retries.
pub fn addressee_of(line: &str) -> Option<String> {
    let captures = ADDRESSEE.captures(line)?;
    let nick = captures.get(1)?.as_str().trim();
    if nick.is_empty() {
        return None;
    }
    Some(nick.to_string())
}

/// Stitches directed lines into a fake exchange between nicks.
///
/// Each step replays a line in which the current nick addresses someone,
/// then hands over to that someone. After every step there is a 1 in 6
/// chance of ending with a closing line from the addressee, so a chain
/// continues 5 times on average.
#[derive(Debug, Clone)]
pub struct ConversationChainer {
    max_attempts: u32,
    max_length: usize,
}

impl ConversationChainer {
    pub fn new(max_attempts: u32, max_length: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            max_length: max_length.max(1),
        }
    }

    pub fn chain<R: Rng + ?Sized>(
        &self,
        corpus: &dyn CorpusStore,
        rng: &mut R,
        nick: &str,
        channel: &str,
    ) -> Result<Vec<String>, StorageError> {
        let mut lines = Vec::new();
        let mut nick = nick.to_string();

        loop {
            if lines.len() >= self.max_length {
                tracing::warn!("conversation hit {} lines in {}, stopping", self.max_length, channel);
                return Ok(lines);
            }

            let Some((line, addressee)) = self.directed_line(corpus, &nick, channel)? else {
                return Ok(lines);
            };
            lines.push(format!("<{}> {}", nick, line));

            if rng.gen_range(0..=5) == 0 {
                match corpus.random_line(&addressee, channel)? {
                    Some(closing) => lines.push(format!("<{}> {}", addressee, closing)),
                    None => tracing::debug!("{} has no lines to close with", addressee),
                }
                return Ok(lines);
            }

            nick = addressee;
        }
    }

    /// A random directed line by `nick` and the nick it addresses
    fn directed_line(
        &self,
        corpus: &dyn CorpusStore,
        nick: &str,
        channel: &str,
    ) -> Result<Option<(String, String)>, StorageError> {
        let mut attempts = self.max_attempts;
        loop {
            let Some(line) = corpus.random_line_matching(nick, channel, DIRECTED_PATTERN)? else {
                tracing::debug!("no directed lines by {}", nick);
                return Ok(None);
            };
            attempts -= 1;

            if let Some(addressee) = addressee_of(&line) {
                return Ok(Some((line, addressee)));
            }

            if attempts == 0 {
                tracing::warn!(
                    "{:?} should address a nick according to the corpus, but it doesn't. Giving up on conversation",
                    line
                );
                return Ok(None);
            }
        }
    }
}

impl Default for ConversationChainer {
    fn default() -> Self {
        Self::new(20, 100)
    }
}
