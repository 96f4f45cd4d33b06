pub mod message;
pub mod slack;

pub use message::{Attachment, Field, Message, SHORT_FIELD_MAX};
pub use slack::SlackClient;
