//! Graph-only speaker selection.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::agent::Agent;
use crate::error::ChatError;
use crate::orchestrators::{current_speaker, find_candidate, OrchestrationContext, Orchestrator};
use crate::transition::TransitionGraph;

/// Delegates speaker selection entirely to a [`TransitionGraph`].
///
/// The last message's sender is taken as the current speaker. The graph's
/// successor set then decides:
///
/// - exactly one successor: return it directly (no LLM involved);
/// - zero successors: return `Ok(None)`, ending the conversation;
/// - two or more: this orchestrator alone cannot disambiguate, which is a
///   configuration error. Use a role-play orchestrator with an admin agent
///   when the graph branches.
///
/// An empty history means any agent may start: the first roster member with
/// outgoing edges is chosen, falling back to the first roster member.
pub struct WorkflowOrchestrator {
    graph: TransitionGraph,
}

impl WorkflowOrchestrator {
    /// Wrap the given graph.
    pub fn new(graph: TransitionGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl Orchestrator for WorkflowOrchestrator {
    async fn next_speaker<'a>(
        &self,
        context: OrchestrationContext<'a>,
    ) -> Result<Option<Arc<dyn Agent>>, ChatError> {
        let current = match current_speaker(&context)? {
            Some(current) => current,
            None => {
                let starter = context
                    .candidates
                    .iter()
                    .find(|a| self.graph.has_source(a.name()))
                    .or_else(|| context.candidates.first());
                return Ok(starter.cloned());
            }
        };

        let successors = self
            .graph
            .transitions_for(current.as_ref(), context.chat_history)
            .await?;
        debug!(
            "workflow: {} structural successor(s) for '{}'",
            successors.len(),
            current.name()
        );

        match successors.len() {
            0 => Ok(None),
            1 => {
                let chosen = &successors[0];
                // Resolve through the roster so the returned handle is the
                // chat's own, not the graph's copy.
                Ok(find_candidate(context.candidates, chosen.name())
                    .cloned()
                    .or_else(|| Some(Arc::clone(chosen))))
            }
            n => Err(ChatError::Configuration(format!(
                "workflow yields {} candidates after '{}' but no admin is available to choose among them",
                n,
                current.name()
            ))),
        }
    }
}
