//! Command gating — decides which messages are questions for the assistant.

/// Outcome of inspecting one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a command — inert chat traffic, no reply.
    Ignore,
    /// The prefix with nothing after it — caller prompts for a question.
    EmptyArgument,
    /// A question for the assistant, prefix stripped and trimmed.
    Command(String),
}

/// Matches message bodies against the configured command prefix.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    prefix: String,
}

impl CommandDispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Gate one message body. Prefix match is case-insensitive.
    pub fn dispatch(&self, body: &str) -> Dispatch {
        // get() rejects both short bodies and non-boundary slices, so
        // multi-byte text near the prefix length cannot panic.
        let Some(head) = body.get(..self.prefix.len()) else {
            return Dispatch::Ignore;
        };
        if !head.eq_ignore_ascii_case(&self.prefix) {
            return Dispatch::Ignore;
        }

        let remainder = body[self.prefix.len()..].trim();
        if remainder.is_empty() {
            Dispatch::EmptyArgument
        } else {
            Dispatch::Command(remainder.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new("!ask")
    }

    #[test]
    fn test_non_command_is_ignored() {
        assert_eq!(dispatcher().dispatch("hello there"), Dispatch::Ignore);
        assert_eq!(dispatcher().dispatch(""), Dispatch::Ignore);
        assert_eq!(dispatcher().dispatch("ask me something"), Dispatch::Ignore);
    }

    #[test]
    fn test_prefix_must_lead_the_message() {
        assert_eq!(
            dispatcher().dispatch("please !ask how do I reset?"),
            Dispatch::Ignore
        );
    }

    #[test]
    fn test_command_extracts_trimmed_question() {
        assert_eq!(
            dispatcher().dispatch("!ask   how do I reset the router?  "),
            Dispatch::Command("how do I reset the router?".into())
        );
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        assert_eq!(
            dispatcher().dispatch("!ASK what is the warranty period"),
            Dispatch::Command("what is the warranty period".into())
        );
    }

    #[test]
    fn test_bare_prefix_is_empty_argument() {
        assert_eq!(dispatcher().dispatch("!ask"), Dispatch::EmptyArgument);
        assert_eq!(dispatcher().dispatch("!ask    "), Dispatch::EmptyArgument);
    }

    #[test]
    fn test_multibyte_text_near_prefix_boundary() {
        // Shorter than the prefix in bytes, and not a char boundary at 4.
        assert_eq!(dispatcher().dispatch("é"), Dispatch::Ignore);
        assert_eq!(dispatcher().dispatch("açaí"), Dispatch::Ignore);
        assert_eq!(
            dispatcher().dispatch("!ask onde fica o botão de reset?"),
            Dispatch::Command("onde fica o botão de reset?".into())
        );
    }
}
