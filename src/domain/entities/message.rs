/// A line received from the chat network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Nick of the speaker
    pub sender: String,
    /// Channel (or user) the line was addressed to
    pub target: String,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(sender: impl Into<String>, target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            target: target.into(),
            text: text.into(),
        }
    }

    /// Channel messages start with `#` or `&`
    pub fn is_channel(&self) -> bool {
        self.target.starts_with('#') || self.target.starts_with('&')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_channel() {
        assert!(IncomingMessage::new("alice", "#x", "hi").is_channel());
        assert!(IncomingMessage::new("alice", "&local", "hi").is_channel());
        assert!(!IncomingMessage::new("alice", "rehaiku", "hi").is_channel());
    }
}
