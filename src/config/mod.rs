pub mod global;
pub mod hook;

pub use global::{global, initiate};
pub use hook::SlackHookConfig;
