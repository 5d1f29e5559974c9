//! Chat message types exchanged between agents.
//!
//! A [`ChatMessage`] is an immutable unit of conversation content: it carries
//! the sender's name, a [`Role`], and one of a closed set of payload variants
//! (plain text, image, tool call, tool-call result, or an aggregate pairing a
//! tool call with its result). The orchestration core never mutates a message
//! after it has been appended to a history.
//!
//! Two reserved marker substrings drive the conversation loop:
//!
//! - [`TERMINATE_MESSAGE`] in a message's text halts the group-chat loop.
//! - [`CLEAR_MESSAGES`] marks a checkpoint; prompt rendering drops everything
//!   before the most recent checkpoint (see [`crate::history`]).

use serde::{Deserialize, Serialize};

/// Reserved marker: a message containing this substring terminates the chat loop.
pub const TERMINATE_MESSAGE: &str = "[GROUPCHAT_TERMINATE]";

/// Reserved marker: a message containing this substring acts as a history
/// checkpoint for prompt rendering.
pub const CLEAR_MESSAGES: &str = "[GROUPCHAT_CLEAR_MESSAGES]";

/// Represents the possible roles for a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Set by the developer to steer the conversation.
    System,
    /// A message sent by a human user (or app user).
    User,
    /// Content generated by a model in response to prior messages.
    Assistant,
    /// Output of a tool/function execution.
    Tool,
}

/// A single tool/function invocation requested by a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Name of the function the model wants to invoke.
    pub name: String,
    /// JSON-encoded arguments, exactly as produced by the model.
    pub arguments: String,
}

/// The result of executing one [`ToolCallRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    /// Name of the function that was executed.
    pub name: String,
    /// Textual result returned by the function.
    pub content: String,
}

/// A message flowing through a group chat.
///
/// This is a closed sum type over the known message shapes. Formatting and
/// content extraction are exhaustive matches over the variants; external code
/// that only needs the text can go through the [`TextContent`] capability
/// trait instead of matching the full set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChatMessage {
    /// Plain text content.
    Text {
        /// Sender name, if known.
        from: Option<String>,
        /// Conversation role of the sender.
        role: Role,
        /// The message body.
        content: String,
    },
    /// A reference to an image, by URL.
    Image {
        from: Option<String>,
        role: Role,
        url: String,
    },
    /// One or more tool invocations requested by a model.
    ToolCall {
        from: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
    /// The results of executing previously requested tool calls.
    ToolCallResult {
        from: Option<String>,
        results: Vec<ToolCallOutcome>,
    },
    /// A tool-call message paired with its result message.
    Aggregate {
        from: Option<String>,
        call: Box<ChatMessage>,
        result: Box<ChatMessage>,
    },
}

impl ChatMessage {
    /// Create a plain text message.
    pub fn text(from: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        ChatMessage::Text {
            from: Some(from.into()),
            role,
            content: content.into(),
        }
    }

    /// Create a user-role text message.
    pub fn user(from: impl Into<String>, content: impl Into<String>) -> Self {
        Self::text(from, Role::User, content)
    }

    /// Create an assistant-role text message.
    pub fn assistant(from: impl Into<String>, content: impl Into<String>) -> Self {
        Self::text(from, Role::Assistant, content)
    }

    /// Create a system-role text message with no sender.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::Text {
            from: None,
            role: Role::System,
            content: content.into(),
        }
    }

    /// The sender's name, if the message carries one.
    pub fn from(&self) -> Option<&str> {
        match self {
            ChatMessage::Text { from, .. }
            | ChatMessage::Image { from, .. }
            | ChatMessage::ToolCall { from, .. }
            | ChatMessage::ToolCallResult { from, .. }
            | ChatMessage::Aggregate { from, .. } => from.as_deref(),
        }
    }

    /// The conversation role of this message.
    ///
    /// Tool calls are authored by models, so they read as [`Role::Assistant`];
    /// tool results read as [`Role::Tool`]. Aggregates take the role of the
    /// final (result) half.
    pub fn role(&self) -> Role {
        match self {
            ChatMessage::Text { role, .. } | ChatMessage::Image { role, .. } => *role,
            ChatMessage::ToolCall { .. } => Role::Assistant,
            ChatMessage::ToolCallResult { .. } => Role::Tool,
            ChatMessage::Aggregate { result, .. } => result.role(),
        }
    }

    /// The textual content of this message, if it has any.
    ///
    /// Images and bare tool calls carry no text. A tool-call result exposes
    /// the text of its first outcome; an aggregate defers to its result half.
    pub fn content(&self) -> Option<&str> {
        match self {
            ChatMessage::Text { content, .. } => Some(content),
            ChatMessage::Image { .. } => None,
            ChatMessage::ToolCall { .. } => None,
            ChatMessage::ToolCallResult { results, .. } => {
                results.first().map(|r| r.content.as_str())
            }
            ChatMessage::Aggregate { result, .. } => result.content(),
        }
    }

    /// Whether this message carries the reserved terminate marker.
    pub fn is_terminate_signal(&self) -> bool {
        self.content()
            .map(|c| c.contains(TERMINATE_MESSAGE))
            .unwrap_or(false)
    }

    /// Whether this message carries the reserved clear-history marker.
    pub fn is_clear_signal(&self) -> bool {
        self.content()
            .map(|c| c.contains(CLEAR_MESSAGES))
            .unwrap_or(false)
    }
}

/// Capability trait for extracting text content from message-like values.
///
/// [`ChatMessage`] implements it over its closed variant set; external message
/// types can implement it to participate in transcript rendering without the
/// core having to learn about them.
pub trait TextContent {
    /// The textual content, if any.
    fn text_content(&self) -> Option<&str>;
}

impl TextContent for ChatMessage {
    fn text_content(&self) -> Option<&str> {
        self.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_accessors() {
        let msg = ChatMessage::user("alice", "hello");
        assert_eq!(msg.from(), Some("alice"));
        assert_eq!(msg.role(), Role::User);
        assert_eq!(msg.content(), Some("hello"));
    }

    #[test]
    fn tool_call_has_assistant_role_and_no_text() {
        let msg = ChatMessage::ToolCall {
            from: Some("bot".into()),
            calls: vec![ToolCallRequest {
                name: "lookup".into(),
                arguments: "{}".into(),
            }],
        };
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.content(), None);
    }

    #[test]
    fn aggregate_defers_to_result_half() {
        let call = ChatMessage::ToolCall {
            from: Some("bot".into()),
            calls: vec![ToolCallRequest {
                name: "lookup".into(),
                arguments: "{}".into(),
            }],
        };
        let result = ChatMessage::ToolCallResult {
            from: Some("bot".into()),
            results: vec![ToolCallOutcome {
                name: "lookup".into(),
                content: "42".into(),
            }],
        };
        let agg = ChatMessage::Aggregate {
            from: Some("bot".into()),
            call: Box::new(call),
            result: Box::new(result),
        };
        assert_eq!(agg.role(), Role::Tool);
        assert_eq!(agg.content(), Some("42"));
    }

    #[test]
    fn terminate_signal_is_substring_match() {
        let msg = ChatMessage::assistant("a", "All done. [GROUPCHAT_TERMINATE]");
        assert!(msg.is_terminate_signal());
        assert!(!msg.is_clear_signal());

        let plain = ChatMessage::assistant("a", "still going");
        assert!(!plain.is_terminate_signal());
    }

    #[test]
    fn clear_signal_is_substring_match() {
        let msg = ChatMessage::user("a", "[GROUPCHAT_CLEAR_MESSAGES]");
        assert!(msg.is_clear_signal());
    }

    #[test]
    fn text_content_capability_matches_content() {
        let msg = ChatMessage::assistant("a", "visible");
        let capability: &dyn TextContent = &msg;
        assert_eq!(capability.text_content(), Some("visible"));
    }
}
