pub mod layer;

pub use layer::{SlackLayer, SEVERITY_FIELD};
