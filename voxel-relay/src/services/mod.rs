pub mod extract;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod relay;

pub use relay::{PromptRelay, RelayError};
