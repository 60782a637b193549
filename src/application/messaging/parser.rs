//! Event parser - Extracts command / trigger events from raw messages

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::Message;

static LEADING_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<@!?(\d+)>").expect("mention pattern is valid"));

/// What the dispatcher acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `<prefix><command> <content>`
    Command { command: String, content: String },
    /// `<@bot> <trigger> <content>`
    Trigger { trigger: String, content: String },
}

/// Parses incoming messages into dispatchable events
pub struct EventParser {
    command_prefix: String,
    bot_id: String,
}

impl EventParser {
    pub fn new(prefix: impl Into<String>, bot_id: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_id: bot_id.into(),
        }
    }

    /// None for ordinary chat and for anything authored by a bot
    pub fn parse(&self, message: &Message) -> Option<InboundEvent> {
        if message.author.is_bot {
            return None;
        }

        let text = message.content.trim();

        if let Some(rest) = text.strip_prefix(self.command_prefix.as_str()) {
            let (command, content) = split_first_word(rest.trim_start());
            if command.is_empty() {
                return None;
            }
            return Some(InboundEvent::Command {
                command: command.to_lowercase(),
                content: content.to_string(),
            });
        }

        let captures = LEADING_MENTION.captures(text)?;
        if captures.get(1)?.as_str() != self.bot_id {
            return None;
        }

        let rest = &text[captures.get(0)?.end()..];
        let (trigger, content) = split_first_word(rest.trim_start());
        if trigger.is_empty() {
            return None;
        }
        Some(InboundEvent::Trigger {
            trigger: trigger.to_lowercase(),
            content: content.to_string(),
        })
    }
}

fn split_first_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;

    fn parser() -> EventParser {
        EventParser::new("_", "1")
    }

    fn msg(text: &str) -> Message {
        Message::new("c1", User::new("u1"), text)
    }

    #[test]
    fn test_command_with_content() {
        let event = parser().parse(&msg("_Gallery add  #source #target 123 tok  "));
        assert_eq!(
            event,
            Some(InboundEvent::Command {
                command: "gallery".into(),
                content: "add  #source #target 123 tok".into(),
            })
        );
    }

    #[test]
    fn test_command_without_content() {
        let event = parser().parse(&msg("_ping"));
        assert_eq!(
            event,
            Some(InboundEvent::Command {
                command: "ping".into(),
                content: String::new(),
            })
        );
    }

    #[test]
    fn test_bare_prefix_is_ignored() {
        assert_eq!(parser().parse(&msg("_")), None);
        assert_eq!(parser().parse(&msg("_   ")), None);
    }

    #[test]
    fn test_trigger_needs_bot_mention() {
        assert_eq!(
            parser().parse(&msg("<@!1> Hi there")),
            Some(InboundEvent::Trigger {
                trigger: "hi".into(),
                content: "there".into(),
            })
        );
        assert_eq!(parser().parse(&msg("<@2> hi")), None);
        assert_eq!(parser().parse(&msg("<@1>")), None);
        assert_eq!(parser().parse(&msg("hi everyone")), None);
    }

    #[test]
    fn test_bots_are_ignored() {
        let message = Message::new("c1", User::new("b").bot(), "_ping");
        assert_eq!(parser().parse(&message), None);
    }
}
