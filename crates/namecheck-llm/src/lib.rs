//! LLM access for the namecheck prediction service.
//!
//! - [`Completion`] — Seam over the external provider; one call, one reply
//! - [`LlmClient`] — OpenAI-compatible implementation of [`Completion`]
//! - [`build_prompt`] / [`SYSTEM_PROMPT`] — Instruction prompt for a name
//! - [`classify_reply`] — Maps free-text replies to a [`Label`](namecheck_core::Label)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use namecheck_config::ServerConfig;
//! use namecheck_core::ModelId;
//! use namecheck_llm::{build_prompt, classify_reply, Completion, LlmClient, SYSTEM_PROMPT};
//!
//! let client = LlmClient::from_config(&ServerConfig::from_env()?);
//! let reply = client
//!     .complete(ModelId::Gpt4oMini, SYSTEM_PROMPT, &build_prompt("Aisha Khan"))
//!     .await?;
//! let classification = classify_reply(&reply.content)?;
//! println!("{}", classification.label);
//! ```

mod classify;
mod client;
mod prompt;

pub use classify::{classify_reply, Classification};
pub use client::{Completion, LlmClient, LlmMetrics, LlmResponse};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
