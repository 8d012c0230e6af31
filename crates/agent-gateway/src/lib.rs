//! Access to the external language model that writes the agent's replies.

pub mod config;
pub mod error;
pub mod openai;

use async_trait::async_trait;

pub use crate::config::AgentConfig;
pub use crate::error::AgentError;
pub use crate::openai::OpenAiAgent;

/// Something that turns a user prompt into a reply.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<String, AgentError>;
}
