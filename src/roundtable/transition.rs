//! Directed, predicate-guarded transitions between agents.
//!
//! A [`TransitionGraph`] constrains legal speaker succession: an edge
//! `(from, to)` optionally carries an async predicate over the chat history,
//! and [`transitions_for`](TransitionGraph::transitions_for) computes the
//! agents structurally allowed to speak after a given one.
//!
//! The graph itself performs no roster validation; that happens when it is
//! installed into a [`GroupChat`](crate::group_chat::GroupChat).

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::agent::Agent;
use crate::error::ChatError;
use crate::message::ChatMessage;

/// Async predicate deciding whether an edge qualifies for a given history.
///
/// A failing predicate signals a bug in caller-supplied logic; failures are
/// propagated, not swallowed, and abort the speaker-selection call.
pub type TransitionPredicate =
    Arc<dyn for<'a> Fn(&'a [ChatMessage]) -> BoxFuture<'a, Result<bool, ChatError>> + Send + Sync>;

/// A directed edge between two agents, immutable once created.
#[derive(Clone)]
pub struct Transition {
    from: Arc<dyn Agent>,
    to: Arc<dyn Agent>,
    predicate: Option<TransitionPredicate>,
}

impl Transition {
    /// An unconditional edge: `to` may always follow `from`.
    pub fn new(from: Arc<dyn Agent>, to: Arc<dyn Agent>) -> Self {
        Self {
            from,
            to,
            predicate: None,
        }
    }

    /// An edge that only qualifies when `predicate` evaluates true against
    /// the current history.
    pub fn with_predicate(
        from: Arc<dyn Agent>,
        to: Arc<dyn Agent>,
        predicate: TransitionPredicate,
    ) -> Self {
        Self {
            from,
            to,
            predicate: Some(predicate),
        }
    }

    /// The edge's source agent.
    pub fn from_agent(&self) -> &Arc<dyn Agent> {
        &self.from
    }

    /// The edge's target agent.
    pub fn to_agent(&self) -> &Arc<dyn Agent> {
        &self.to
    }
}

/// A directed graph over agents, stored as an ordered edge list.
#[derive(Clone, Default)]
pub struct TransitionGraph {
    transitions: Vec<Transition>,
}

impl TransitionGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list in one go.
    pub fn from_transitions(transitions: Vec<Transition>) -> Self {
        Self { transitions }
    }

    /// Append an edge. Multiple edges may share the same source.
    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// All distinct agent names referenced by any edge. Used by
    /// [`GroupChat`](crate::group_chat::GroupChat) to validate the graph
    /// against its roster.
    pub fn agent_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for t in &self.transitions {
            for name in [t.from.name(), t.to.name()] {
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Whether any edge originates from the named agent.
    pub fn has_source(&self, name: &str) -> bool {
        self.transitions.iter().any(|t| t.from.name() == name)
    }

    /// Compute the agents allowed to follow `from` given `history`.
    ///
    /// Predicates are evaluated in edge-insertion order; a target reachable
    /// through several qualifying edges appears once, at its first-seen
    /// position. An agent with no outgoing edges yields an empty list,
    /// callers treat this as "no structural successor", not an error.
    pub async fn transitions_for(
        &self,
        from: &dyn Agent,
        history: &[ChatMessage],
    ) -> Result<Vec<Arc<dyn Agent>>, ChatError> {
        let mut seen = HashSet::new();
        let mut successors: Vec<Arc<dyn Agent>> = Vec::new();
        for transition in self.transitions.iter().filter(|t| t.from.name() == from.name()) {
            if let Some(predicate) = &transition.predicate {
                if !predicate(history).await? {
                    continue;
                }
            }
            if seen.insert(transition.to.name().to_string()) {
                successors.push(Arc::clone(&transition.to));
            }
        }
        Ok(successors)
    }
}
