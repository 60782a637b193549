//! Localized user-facing texts

use once_cell::sync::Lazy;
use std::collections::HashMap;

static DEFAULT_TEXTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("admin.no_permission", "You need to be an admin to use this command."),
        ("mod.no_permission", "You need to be a moderator to use this command."),
        ("botadmin.no_permission", "Only bot admins can use this command."),
        ("robyulmod.no_permission", "Only bot moderators can use this command."),
        ("bot.errors.header", "Error :frowning:"),
        ("bot.errors.no-embed", "I can't post embeds in this channel, please give me the `Embed Links` permission."),
        ("bot.arguments.too-few", "You need to give me more arguments."),
        ("bot.arguments.invalid", "Some of the arguments are invalid."),
        ("plugins.announce.sent", "Announcement sent to {} channel(s)."),
        ("plugins.choice.empty", "Give me some options separated by `|`."),
    ])
});

/// Text table: built-in defaults overlaid with configured overrides
#[derive(Debug, Clone, Default)]
pub struct Texts {
    overrides: HashMap<String, String>,
}

impl Texts {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Unknown keys come back verbatim so a missing entry is visible in chat
    pub fn get(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        DEFAULT_TEXTS
            .get(key)
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Like [`Texts::get`], replacing each `{}` in order
    pub fn get_f(&self, key: &str, args: &[&str]) -> String {
        let mut text = self.get(key);
        for arg in args {
            match text.find("{}") {
                Some(pos) => text.replace_range(pos..pos + 2, arg),
                None => break,
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_and_fallback() {
        let texts = Texts::new(HashMap::from([(
            "admin.no_permission".to_string(),
            "Nope.".to_string(),
        )]));

        assert_eq!(texts.get("admin.no_permission"), "Nope.");
        assert!(texts.get("mod.no_permission").contains("moderator"));
        assert_eq!(texts.get("does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_get_f_substitutes_in_order() {
        let texts = Texts::default();
        assert_eq!(texts.get_f("plugins.announce.sent", &["3"]), "Announcement sent to 3 channel(s).");
    }
}
