//! Speaker-selection strategies.
//!
//! An [`Orchestrator`] decides, round by round, which agent speaks next.
//! All strategies share one contract: given the full candidate roster and
//! the current history, return `Ok(Some(agent))` to continue, `Ok(None)` to
//! stop the conversation normally, or `Err` to abort the round.
//!
//! The shared state machine is: compute the structurally eligible candidate
//! set. Zero candidates means terminate; exactly one is a deterministic pick
//! with no LLM call; many: delegate to the strategy (roster order, an admin
//! LLM's free-text choice, or a forced tool call). No orchestrator retains
//! cross-call state; everything is derived fresh from the supplied history.

pub mod role_play;
pub mod round_robin;
pub mod tool_call;
pub mod workflow;

pub use role_play::RolePlayOrchestrator;
pub use round_robin::RoundRobinOrchestrator;
pub use tool_call::RolePlayToolCallOrchestrator;
pub use workflow::WorkflowOrchestrator;

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::Agent;
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::transition::TransitionGraph;

/// Ephemeral inputs to one speaker-selection call. Not retained between
/// calls.
#[derive(Clone, Copy)]
pub struct OrchestrationContext<'a> {
    /// The full agent roster, in registration order.
    pub candidates: &'a [Arc<dyn Agent>],
    /// The working history, oldest first. Includes any introduction
    /// messages the chat was seeded with.
    pub chat_history: &'a [ChatMessage],
}

/// A speaker-selection strategy.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Select the next speaker, or return `Ok(None)` to end the
    /// conversation.
    async fn next_speaker<'a>(
        &self,
        context: OrchestrationContext<'a>,
    ) -> Result<Option<Arc<dyn Agent>>, ChatError>;
}

/// Find a roster member by exact name.
pub(crate) fn find_candidate<'a>(
    candidates: &'a [Arc<dyn Agent>],
    name: &str,
) -> Option<&'a Arc<dyn Agent>> {
    candidates.iter().find(|a| a.name() == name)
}

/// Resolve the current speaker from the tail of the history.
///
/// Returns `None` for an empty history. A last message whose sender is
/// missing or unknown to the roster is a roster/caller error.
pub(crate) fn current_speaker<'a>(
    context: &OrchestrationContext<'a>,
) -> Result<Option<&'a Arc<dyn Agent>>, ChatError> {
    let last = match context.chat_history.last() {
        Some(last) => last,
        None => return Ok(None),
    };
    let sender = last.from().ok_or_else(|| {
        ChatError::Configuration("last message in history has no sender".into())
    })?;
    let agent = find_candidate(context.candidates, sender).ok_or_else(|| {
        ChatError::Configuration(format!(
            "last speaker '{}' is not in the roster",
            sender
        ))
    })?;
    Ok(Some(agent))
}

/// Compute the structurally eligible candidates for the next turn.
///
/// With a graph and a resolvable current speaker, this is the graph's
/// successor set; otherwise the full roster. Both role-play orchestrators
/// share this step before delegating to their selection mechanism.
pub(crate) async fn eligible_candidates<'a>(
    graph: Option<&TransitionGraph>,
    context: &OrchestrationContext<'a>,
) -> Result<Vec<Arc<dyn Agent>>, ChatError> {
    let graph = match graph {
        Some(graph) => graph,
        None => return Ok(context.candidates.to_vec()),
    };
    match current_speaker(context)? {
        Some(current) => {
            let successors = graph
                .transitions_for(current.as_ref(), context.chat_history)
                .await?;
            // Hand back the roster's own handles where possible.
            Ok(successors
                .into_iter()
                .map(|s| {
                    find_candidate(context.candidates, s.name())
                        .cloned()
                        .unwrap_or(s)
                })
                .collect())
        }
        None => Ok(context.candidates.to_vec()),
    }
}
