//! # roundtable
//!
//! roundtable is a multi-agent conversation engine: a roster of chat agents
//! exchanges messages while an orchestration strategy decides, round by
//! round, who speaks next.
//!
//! The crate provides layered abstractions for:
//!
//! * **Agents**: the [`Agent`] trait: "given an ordered message history,
//!   asynchronously produce one reply, or fail." LLM client wrappers, human
//!   proxies, and stubs like [`DefaultReplyAgent`] all live behind it.
//! * **Middleware**: [`MiddlewareAgent`] wraps any agent in an ordered,
//!   LIFO-invoked interceptor chain that can rewrite inputs, short-circuit
//!   with its own reply, or post-process results (see
//!   [`middleware::FunctionCallMiddleware`]).
//! * **Transition graphs**: [`TransitionGraph`] constrains legal speaker
//!   succession with directed, predicate-guarded edges.
//! * **Orchestrators**: round-robin, graph-driven workflow, and two
//!   LLM-assisted role-play strategies (free-text and tool-call) in
//!   [`orchestrators`].
//! * **The driver**: [`GroupChat`] runs the turn loop: pick a speaker,
//!   collect the reply, append it, check for the terminate marker, repeat
//!   until the round budget runs out.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roundtable::{DefaultReplyAgent, GroupChat};
//! use roundtable::message::ChatMessage;
//! use roundtable::orchestrators::RoundRobinOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let alice = Arc::new(DefaultReplyAgent::new("alice", "Hi, I'm Alice."));
//!     let bob = Arc::new(DefaultReplyAgent::new("bob", "And I'm Bob."));
//!
//!     let chat = GroupChat::new(
//!         vec![alice, bob],
//!         Arc::new(RoundRobinOrchestrator),
//!         Vec::new(),
//!     )?;
//!
//!     let history = chat.call(
//!         Some(vec![ChatMessage::user("bob", "Shall we introduce ourselves?")]),
//!         4,
//!     ).await?;
//!     for message in &history {
//!         println!(
//!             "{}: {}",
//!             message.from().unwrap_or("system"),
//!             message.content().unwrap_or("")
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## What the crate deliberately does not do
//!
//! Concrete LLM provider clients, vector stores, persistence, and UI
//! concerns are external collaborators. Anything that can answer a message
//! history with one reply message plugs in through [`Agent`].

pub mod roundtable;

// Re-exporting key items for easier external access.
pub use roundtable::agent;
pub use roundtable::agent::{Agent, DefaultReplyAgent, FunctionContract, GenerateOptions};
pub use roundtable::error;
pub use roundtable::error::ChatError;
pub use roundtable::group_chat;
pub use roundtable::group_chat::{derive_orchestrator, GroupChat, DEFAULT_MAX_ROUND};
pub use roundtable::history;
pub use roundtable::message;
pub use roundtable::message::{ChatMessage, Role, CLEAR_MESSAGES, TERMINATE_MESSAGE};
pub use roundtable::middleware;
pub use roundtable::middleware::{Middleware, MiddlewareAgent};
pub use roundtable::orchestrators;
pub use roundtable::orchestrators::{OrchestrationContext, Orchestrator};
pub use roundtable::transition;
pub use roundtable::transition::{Transition, TransitionGraph, TransitionPredicate};
