//! # Imperium AI
//!
//! Fund-operations agents for global asset managers: legal drafting, treasury
//! summaries, LP correspondence, ESG analysis and risk review, each produced by
//! a hosted chat-completion model (Groq, OpenAI-compatible API).
//!
//! ## Core Concepts
//!
//! - **Prompt**: one instruction string built from the user's form input by a
//!   pure function in [`llm::prompts`]
//! - **Completion Client**: one request per call carrying a fixed persona and
//!   the prompt; returns the first choice, trimmed
//! - **Agents**: five thin adapters ([`FundAgents`]) from form input to prompt
//!   to completion
//! - **Shell**: tab model and input validation ([`shell`]); missing input never
//!   reaches the network
//!
//! ## Example
//!
//! ```rust,ignore
//! use imperium_ai::*;
//!
//! let config = ImperiumConfig::from_env()?;
//! let agents = FundAgents::new(CompletionClient::from_config(&config));
//!
//! let draft = agents
//!     .legal_ops("Fund X, Q3 2024, raised $50M", DocumentType::Nda)
//!     .await;
//! match draft {
//!     Ok(text) => println!("{}", text),
//!     Err(e) => println!("{}", e.display_text()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod schema;
pub mod shell;

pub use config::{ImperiumConfig, DEFAULT_MODEL, GROQ_BASE_URL};
pub use error::{ErrorKind, ImperiumError, Result};
pub use ingestion::{CellValue, FundTable, TablePreview, PREVIEW_ROWS};
pub use llm::{ChatBackend, CompletionClient, FundAgents};
#[cfg(feature = "groq")]
pub use llm::GroqClient;
pub use schema::DocumentType;
pub use shell::{run_tab, Tab, TabOutcome, TabRequest};
