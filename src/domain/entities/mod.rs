//! Domain entities - Core business objects with no external dependencies

pub mod guild;
pub mod message;
pub mod user;

pub use guild::{all_permissions, permissions, Channel, Guild, Member, Role, EVERYONE_ROLE};
pub use message::{Embed, Message, MessageSend, SentMessage};
pub use user::User;
