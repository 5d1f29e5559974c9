//! The conversation driver: roster + orchestrator + turn loop.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};

use crate::agent::Agent;
use crate::error::ChatError;
use crate::message::ChatMessage;
use crate::orchestrators::{
    OrchestrationContext, Orchestrator, RolePlayOrchestrator, RoundRobinOrchestrator,
    WorkflowOrchestrator,
};
use crate::transition::TransitionGraph;

/// Round budget used by [`GroupChat::call_default`].
pub const DEFAULT_MAX_ROUND: usize = 10;

/// Build the orchestrator implied by the legacy `(admin?, workflow?)`
/// constructor arguments.
///
/// - admin supplied: role-play selection, constrained by the workflow graph
///   when one is given;
/// - workflow only: graph-driven selection;
/// - neither: round-robin.
///
/// Kept as a standalone factory so the inference is testable independently
/// of [`GroupChat`] construction.
pub fn derive_orchestrator(
    admin: Option<Arc<dyn Agent>>,
    workflow: Option<TransitionGraph>,
) -> Arc<dyn Orchestrator> {
    match (admin, workflow) {
        (Some(admin), Some(graph)) => Arc::new(RolePlayOrchestrator::with_graph(admin, graph)),
        (Some(admin), None) => Arc::new(RolePlayOrchestrator::new(admin)),
        (None, Some(graph)) => Arc::new(WorkflowOrchestrator::new(graph)),
        (None, None) => Arc::new(RoundRobinOrchestrator),
    }
}

/// A multi-agent conversation.
///
/// Owns the agent roster (fixed after construction), the introduction
/// messages (append-only via [`send_introduction`](Self::send_introduction)),
/// and the [`Orchestrator`] that picks speakers. [`call`](Self::call) may be
/// invoked multiple times; each run builds a fresh working history from the
/// introduction messages plus the caller-supplied seed.
pub struct GroupChat {
    members: Vec<Arc<dyn Agent>>,
    orchestrator: Arc<dyn Orchestrator>,
    initialize_messages: Vec<ChatMessage>,
}

impl GroupChat {
    /// Create a chat with an explicit orchestrator.
    ///
    /// Fails with [`ChatError::Configuration`] if any member name is empty
    /// or duplicated.
    pub fn new(
        members: Vec<Arc<dyn Agent>>,
        orchestrator: Arc<dyn Orchestrator>,
        initialize_messages: Vec<ChatMessage>,
    ) -> Result<Self, ChatError> {
        validate_roster(&members)?;
        Ok(Self {
            members,
            orchestrator,
            initialize_messages,
        })
    }

    /// Legacy constructor: derive the orchestrator from optional `admin`
    /// and `workflow` arguments via [`derive_orchestrator`].
    ///
    /// Also validates that a supplied workflow only references roster
    /// members; a graph edge naming an outside agent is a configuration
    /// error here, not at traversal time.
    pub fn with_admin(
        members: Vec<Arc<dyn Agent>>,
        admin: Option<Arc<dyn Agent>>,
        initialize_messages: Vec<ChatMessage>,
        workflow: Option<TransitionGraph>,
    ) -> Result<Self, ChatError> {
        validate_roster(&members)?;
        if let Some(graph) = &workflow {
            let roster: HashSet<&str> = members.iter().map(|m| m.name()).collect();
            for name in graph.agent_names() {
                if !roster.contains(name.as_str()) {
                    return Err(ChatError::Configuration(format!(
                        "workflow references agent '{}' which is not in the roster",
                        name
                    )));
                }
            }
        }
        let orchestrator = derive_orchestrator(admin, workflow);
        Ok(Self {
            members,
            orchestrator,
            initialize_messages,
        })
    }

    /// The roster, in registration order.
    pub fn members(&self) -> &[Arc<dyn Agent>] {
        &self.members
    }

    /// The introduction messages prepended to every run.
    pub fn initialize_messages(&self) -> &[ChatMessage] {
        &self.initialize_messages
    }

    /// Append an introduction message.
    ///
    /// Meant for setup, before or between [`call`](Self::call) invocations;
    /// the chat provides no internal locking, so callers must not interleave
    /// this with an in-flight run.
    pub fn send_introduction(&mut self, message: ChatMessage) {
        self.initialize_messages.push(message);
    }

    /// Run the turn loop and return the final history.
    ///
    /// The working history is the introduction messages followed by
    /// `chat_history` (if any). Each round asks the orchestrator for the
    /// next speaker, feeds the *full* working history to that agent, and
    /// appends the reply. The loop stops when:
    ///
    /// - the orchestrator returns no speaker (normal termination),
    /// - a reply carries the terminate marker (returned history includes it),
    /// - or `max_round` replies have been appended.
    ///
    /// Errors from the orchestrator or an agent abort the run mid-round and
    /// propagate unchanged; the driver does not checkpoint partial state.
    /// To impose a timeout, wrap the returned future (e.g. in
    /// `tokio::time::timeout`); dropping it abandons the in-flight round
    /// without appending a partial reply.
    pub async fn call(
        &self,
        chat_history: Option<Vec<ChatMessage>>,
        max_round: usize,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let mut working = self.initialize_messages.clone();
        if let Some(seed) = chat_history {
            working.extend(seed);
        }

        let mut rounds_remaining = max_round;
        while rounds_remaining > 0 {
            let context = OrchestrationContext {
                candidates: &self.members,
                chat_history: &working,
            };
            let speaker = match self.orchestrator.next_speaker(context).await? {
                Some(speaker) => speaker,
                None => {
                    info!("no eligible next speaker; ending conversation");
                    break;
                }
            };
            debug!("round {}: '{}' speaks", max_round - rounds_remaining, speaker.name());

            let reply = speaker.generate_reply(&working, None).await?;
            let terminate = reply.is_terminate_signal();
            working.push(reply);
            if terminate {
                info!("terminate signal received from '{}'", speaker.name());
                break;
            }
            rounds_remaining -= 1;
        }

        Ok(working)
    }

    /// [`call`](Self::call) with a round budget of [`DEFAULT_MAX_ROUND`].
    pub async fn call_default(
        &self,
        chat_history: Option<Vec<ChatMessage>>,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.call(chat_history, DEFAULT_MAX_ROUND).await
    }
}

fn validate_roster(members: &[Arc<dyn Agent>]) -> Result<(), ChatError> {
    let mut seen = HashSet::new();
    for member in members {
        let name = member.name();
        if name.is_empty() {
            return Err(ChatError::Configuration(
                "agent names must be non-empty".into(),
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(ChatError::Configuration(format!(
                "duplicate agent name in roster: '{}'",
                name
            )));
        }
    }
    Ok(())
}
