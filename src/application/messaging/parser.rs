//! Message classifier - decides whether a line is a command or corpus text

use crate::domain::entities::{Classification, Command, CommandName};

/// Splits incoming lines into commands, corpus text and ignored noise
#[derive(Debug, Clone)]
pub struct MessageClassifier {
    command_prefix: char,
    ignore_prefixes: Vec<char>,
    vocabulary: Vec<CommandName>,
}

impl MessageClassifier {
    pub fn new(prefix: char, ignore_prefixes: impl IntoIterator<Item = char>) -> Self {
        Self {
            command_prefix: prefix,
            ignore_prefixes: ignore_prefixes.into_iter().collect(),
            vocabulary: CommandName::ALL.to_vec(),
        }
    }

    /// Restrict the recognized commands
    #[cfg(test)]
    pub fn with_vocabulary(mut self, vocabulary: impl IntoIterator<Item = CommandName>) -> Self {
        self.vocabulary = vocabulary.into_iter().collect();
        self
    }

    pub fn classify(&self, text: &str) -> Classification {
        if let Some(command) = self.parse_command(text) {
            tracing::info!("got command name {} {}", command.name, command.args);
            return Classification::Command(command);
        }

        // Unknown commands land here too and are judged by their first character
        match text.chars().next() {
            Some(first) if self.ignore_prefixes.contains(&first) => Classification::Ignored,
            _ => Classification::Corpus,
        }
    }

    fn parse_command(&self, text: &str) -> Option<Command> {
        let body = text.strip_prefix(self.command_prefix)?;

        let (name, args) = match body.split_once(' ') {
            Some((name, rest)) => (name.trim(), rest.trim()),
            None => (body, ""),
        };

        let name = CommandName::parse(name)?;
        if !self.vocabulary.contains(&name) {
            return None;
        }
        Some(Command::new(name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> MessageClassifier {
        MessageClassifier::new('!', ['!'])
    }

    #[test]
    fn test_plain_text_is_corpus() {
        assert_eq!(classifier().classify("hello everyone"), Classification::Corpus);
        assert_eq!(classifier().classify(""), Classification::Corpus);
    }

    #[test]
    fn test_unprefixed_command_name_is_not_a_command() {
        for name in CommandName::ALL {
            assert_eq!(classifier().classify(name.as_str()), Classification::Corpus);
            let text = format!("?{}", name);
            assert_eq!(classifier().classify(&text), Classification::Corpus);
        }
    }

    #[test]
    fn test_bare_command() {
        for name in CommandName::ALL {
            let text = format!("!{}", name);
            assert_eq!(
                classifier().classify(&text),
                Classification::Command(Command::new(name, ""))
            );
        }
    }

    #[test]
    fn test_arguments_are_trimmed() {
        for name in CommandName::ALL {
            let text = format!("!{}  arg1 arg2  ", name);
            assert_eq!(
                classifier().classify(&text),
                Classification::Command(Command::new(name, "arg1 arg2"))
            );
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(classifier().classify("!Replay bob"), Classification::Ignored);
    }

    #[test]
    fn test_unknown_command_is_ignored_when_prefix_is_ignored() {
        assert_eq!(classifier().classify("!help"), Classification::Ignored);
    }

    #[test]
    fn test_unknown_command_falls_back_to_corpus() {
        let classifier = MessageClassifier::new('!', ['.']);
        assert_eq!(classifier.classify("!help me"), Classification::Corpus);
        assert_eq!(classifier.classify(".quote"), Classification::Ignored);
    }

    #[test]
    fn test_ignore_applies_to_non_prefixed_text() {
        let classifier = MessageClassifier::new('!', ['.', '@']);
        assert_eq!(classifier.classify("@bob hi"), Classification::Ignored);
        assert_eq!(
            classifier.classify("!conv"),
            Classification::Command(Command::new(CommandName::Conv, ""))
        );
    }

    #[test]
    fn test_restricted_vocabulary() {
        let classifier = MessageClassifier::new('!', Vec::new()).with_vocabulary([CommandName::Stats]);
        assert_eq!(
            classifier.classify("!stats"),
            Classification::Command(Command::new(CommandName::Stats, ""))
        );
        assert_eq!(classifier.classify("!replay"), Classification::Corpus);
    }

    #[test]
    fn test_prefix_with_trailing_space_only() {
        assert_eq!(
            classifier().classify("!stats "),
            Classification::Command(Command::new(CommandName::Stats, ""))
        );
    }
}
