use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents a chat user (the acting identity of a message)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            discriminator: None,
            is_bot: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// `name#1234`, falling back to the bare name or the id
    pub fn display_name(&self) -> String {
        match (&self.username, &self.discriminator) {
            (Some(name), Some(disc)) => format!("{}#{}", name, disc),
            (Some(name), None) => name.clone(),
            _ => self.id.clone(),
        }
    }

    /// Mention markup understood by the chat platform
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
