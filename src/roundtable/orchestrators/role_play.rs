//! LLM-driven speaker selection via free-text role play.
//!
//! This is the legacy selection path: the admin model is asked to continue
//! a role-play transcript and the chosen name is recovered by string
//! parsing. Where the admin's backend supports structured tool calls,
//! prefer [`RolePlayToolCallOrchestrator`](crate::orchestrators::RolePlayToolCallOrchestrator),
//! which removes the parsing fragility entirely.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::agent::{Agent, GenerateOptions};
use crate::error::ChatError;
use crate::history::{messages_to_keep, render_role_play_transcript};
use crate::message::ChatMessage;
use crate::orchestrators::{eligible_candidates, OrchestrationContext, Orchestrator};
use crate::transition::TransitionGraph;

/// The reply prefix the admin is instructed to produce. Parsing strips
/// exactly this many characters, so the format instruction and the parser
/// must stay in sync.
const FROM_PREFIX: &str = "From ";

/// Selects the next speaker by asking an admin agent to continue a
/// role-play transcript.
///
/// If a transition graph is configured it filters the candidates first:
/// exactly one structural successor is returned directly with no LLM call,
/// and zero successors ends the conversation. Only a branching candidate
/// set reaches the admin.
///
/// The admin is called with `temperature = 0`, a small token cap, and a
/// `":"` stop sequence, so generation halts right after the chosen name.
/// The reply is parsed by stripping the fixed `"From "` prefix and matching
/// the remainder case-insensitively against the candidate names; an
/// unparseable reply is a [`ChatError::Selection`], never a silent guess.
/// This brittle parse is kept deliberately for compatibility with the
/// transcript format the admin is shown.
pub struct RolePlayOrchestrator {
    admin: Arc<dyn Agent>,
    graph: Option<TransitionGraph>,
}

impl RolePlayOrchestrator {
    /// Selection among the full roster, no structural constraint.
    pub fn new(admin: Arc<dyn Agent>) -> Self {
        Self { admin, graph: None }
    }

    /// Selection constrained by a transition graph.
    pub fn with_graph(admin: Arc<dyn Agent>, graph: TransitionGraph) -> Self {
        Self {
            admin,
            graph: Some(graph),
        }
    }

    fn selection_prompt(candidates: &[Arc<dyn Agent>]) -> ChatMessage {
        let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
        ChatMessage::system(format!(
            "You are in a role play game. Carefully read the conversation history and carry on the conversation.\n\
             The available roles are: {}.\n\
             Each message MUST start with 'From name:', e.g:\n\
             From {}:\n\
             //your message//.",
            names.join(","),
            names[0]
        ))
    }
}

#[async_trait]
impl Orchestrator for RolePlayOrchestrator {
    async fn next_speaker<'a>(
        &self,
        context: OrchestrationContext<'a>,
    ) -> Result<Option<Arc<dyn Agent>>, ChatError> {
        let candidates = eligible_candidates(self.graph.as_ref(), &context).await?;
        match candidates.len() {
            0 => return Ok(None),
            1 => return Ok(Some(Arc::clone(&candidates[0]))),
            _ => {}
        }

        let mut prompt = vec![Self::selection_prompt(&candidates)];
        prompt.extend(render_role_play_transcript(messages_to_keep(
            context.chat_history,
        )));

        let options = GenerateOptions {
            temperature: Some(0.0),
            max_tokens: Some(128),
            stop_sequences: vec![":".to_string()],
            functions: Vec::new(),
        };
        let reply = self.admin.generate_reply(&prompt, Some(&options)).await?;
        let content = reply.content().ok_or_else(|| {
            ChatError::Selection("admin reply carries no text to parse".into())
        })?;
        debug!("role-play admin replied: {:?}", content);

        // The instructed format is exactly "From <name>"; strip the fixed
        // 5-character prefix and resolve the remainder.
        let name = content.get(FROM_PREFIX.len()..).ok_or_else(|| {
            ChatError::Selection(format!(
                "admin reply {:?} is shorter than the expected 'From ' prefix",
                content
            ))
        })?;

        candidates
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .map(|c| Some(Arc::clone(c)))
            .ok_or_else(|| {
                ChatError::Selection(format!(
                    "admin chose {:?}, which matches no candidate",
                    name
                ))
            })
    }
}
