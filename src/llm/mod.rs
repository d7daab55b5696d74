pub mod agents;
pub mod client;
pub mod prompts;
pub mod types;

pub use agents::*;
pub use client::*;
pub use types::*;
