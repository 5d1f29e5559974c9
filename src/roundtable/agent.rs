//! The agent capability: "given a message history, asynchronously produce one
//! reply message, or fail."
//!
//! The orchestration core consumes agents through the [`Agent`] trait and
//! never looks inside them. Concrete implementations typically wrap an LLM
//! client; [`DefaultReplyAgent`] is a static stub useful for tests, demos,
//! and placeholder roster members.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::message::ChatMessage;

/// Declares a callable function to a model so it can emit a structured
/// tool call instead of free text.
///
/// `parameters` is a JSON Schema object, typically built with
/// `serde_json::json!`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionContract {
    /// Function name the model must reference in its tool call.
    pub name: String,
    /// Natural-language description shown to the model.
    pub description: String,
    /// JSON Schema for the function's arguments.
    pub parameters: serde_json::Value,
}

/// Optional generation parameters forwarded to an agent's underlying model.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Sampling temperature. `Some(0.0)` requests deterministic output.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<usize>,
    /// Sequences at which generation stops.
    pub stop_sequences: Vec<String>,
    /// Functions the model may (or must) call.
    pub functions: Vec<FunctionContract>,
}

/// A named conversational capability.
///
/// Implementations must be safe to share across tasks (`Send + Sync`); the
/// core holds them behind `Arc<dyn Agent>`. Any internal state (an LLM
/// client, a session) is private to the implementation; the orchestration
/// core owns no per-agent mutable state.
///
/// Cancellation follows the usual Rust model: dropping the future returned
/// by [`generate_reply`](Agent::generate_reply) (e.g. via
/// `tokio::time::timeout`) abandons the in-flight call.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's name. Must be non-empty and unique within any single
    /// group-chat roster; the chat constructor enforces this.
    fn name(&self) -> &str;

    /// Produce one reply to the given ordered history.
    ///
    /// `messages` is oldest-first. Implementations should set the reply's
    /// sender to their own name so orchestrators can attribute it.
    async fn generate_reply(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> Result<ChatMessage, ChatError>;
}

/// An agent that always answers with the same fixed text.
///
/// Handy as a workflow placeholder or a deterministic test double.
pub struct DefaultReplyAgent {
    name: String,
    reply: String,
}

impl DefaultReplyAgent {
    /// Create a stub agent with the given name and canned reply.
    pub fn new(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Agent for DefaultReplyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_reply(
        &self,
        _messages: &[ChatMessage],
        _options: Option<&GenerateOptions>,
    ) -> Result<ChatMessage, ChatError> {
        Ok(ChatMessage::assistant(self.name.clone(), self.reply.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[tokio::test]
    async fn default_reply_agent_echoes_its_reply() {
        let agent = DefaultReplyAgent::new("stub", "always this");
        let reply = agent.generate_reply(&[], None).await.unwrap();
        assert_eq!(reply.from(), Some("stub"));
        assert_eq!(reply.role(), Role::Assistant);
        assert_eq!(reply.content(), Some("always this"));
    }
}
