//! IRC line parsing

/// One parsed protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcLine {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcLine {
    /// Parse a raw line. Message tags are skipped.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut rest = raw.trim_end_matches(['\r', '\n']);

        if rest.starts_with('@') {
            let (_, after) = rest.split_once(' ')?;
            rest = after.trim_start();
        }

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, after) = stripped.split_once(' ')?;
                rest = after.trim_start();
                Some(prefix.to_string())
            }
            None => None,
        };

        let (command, mut tail) = match rest.split_once(' ') {
            Some((command, tail)) => (command, tail),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            tail = tail.trim_start_matches(' ');
            if tail.is_empty() {
                break;
            }
            if let Some(trailing) = tail.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match tail.split_once(' ') {
                Some((param, after)) => {
                    params.push(param.to_string());
                    tail = after;
                }
                None => {
                    params.push(tail.to_string());
                    break;
                }
            }
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    /// Nick portion of a `nick!user@host` prefix
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix.as_deref().and_then(|p| p.split('!').next())
    }
}
