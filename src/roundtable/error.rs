//! Error types shared across the orchestration core.

use std::error::Error;
use std::fmt;

/// Errors that can occur while constructing or running a group chat.
///
/// The core never swallows failures: an orchestrator returning `Ok(None)`
/// means "stop the loop normally", while any `Err` aborts the in-flight
/// round and surfaces unchanged to the caller of
/// [`GroupChat::call`](crate::group_chat::GroupChat::call).
#[derive(Debug)]
pub enum ChatError {
    /// The chat or orchestrator was misconfigured: duplicate or empty agent
    /// names, a workflow graph referencing agents outside the roster, a
    /// missing admin agent, or a round-robin lookup that cannot find the
    /// last speaker in the roster.
    Configuration(String),

    /// Speaker selection failed at runtime: the admin's reply could not be
    /// parsed into a known candidate name, or a tool call named an agent
    /// that is not a candidate.
    Selection(String),

    /// An agent's reply generation failed. Wraps the implementation-defined
    /// error exactly once at the boundary.
    Agent(Box<dyn Error + Send + Sync>),
}

impl ChatError {
    /// Wrap an upstream agent failure.
    pub fn agent(err: impl Error + Send + Sync + 'static) -> Self {
        ChatError::Agent(Box::new(err))
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ChatError::Selection(msg) => write!(f, "Speaker selection failed: {}", msg),
            ChatError::Agent(err) => write!(f, "Agent error: {}", err),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::Agent(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
