//! LLM-driven speaker selection via a forced tool call.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::agent::{Agent, FunctionContract, GenerateOptions};
use crate::error::ChatError;
use crate::history::{messages_to_keep, render_role_play_transcript};
use crate::message::ChatMessage;
use crate::orchestrators::{eligible_candidates, OrchestrationContext, Orchestrator};
use crate::transition::TransitionGraph;

/// Name of the function contract the admin is forced to call.
const PICK_FUNCTION: &str = "pick_next_speaker";

#[derive(Deserialize)]
struct PickArguments {
    name: String,
}

/// Selects the next speaker through a structured tool call instead of
/// free-text parsing.
///
/// Candidate filtering mirrors
/// [`RolePlayOrchestrator`](crate::orchestrators::RolePlayOrchestrator):
/// zero structural successors end the conversation, exactly one is returned
/// with no LLM call. For a branching set, the admin is handed a single
/// function contract whose argument schema is an enum of the candidate
/// names, so any structurally valid reply resolves directly to an agent by
/// exact name match. This is the preferred strategy whenever the admin's
/// backend supports tool calls.
pub struct RolePlayToolCallOrchestrator {
    admin: Arc<dyn Agent>,
    graph: Option<TransitionGraph>,
}

impl RolePlayToolCallOrchestrator {
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

    fn pick_contract(candidates: &[Arc<dyn Agent>]) -> FunctionContract {
        let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
        FunctionContract {
            name: PICK_FUNCTION.to_string(),
            description: "Pick the agent who should speak next.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "enum": names,
                        "description": "Name of the next speaker.",
                    }
                },
                "required": ["name"],
            }),
        }
    }

    fn extract_call(reply: &ChatMessage) -> Option<&crate::message::ToolCallRequest> {
        match reply {
            ChatMessage::ToolCall { calls, .. } => {
                calls.iter().find(|c| c.name == PICK_FUNCTION)
            }
            ChatMessage::Aggregate { call, .. } => Self::extract_call(call),
            _ => None,
        }
    }
}

#[async_trait]
impl Orchestrator for RolePlayToolCallOrchestrator {
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

        let mut prompt = vec![ChatMessage::system(
            "Read the conversation and decide which role should speak next \
             by calling the pick_next_speaker function.",
        )];
        prompt.extend(render_role_play_transcript(messages_to_keep(
            context.chat_history,
        )));

        let options = GenerateOptions {
            temperature: Some(0.0),
            max_tokens: Some(128),
            stop_sequences: Vec::new(),
            functions: vec![Self::pick_contract(&candidates)],
        };
        let reply = self.admin.generate_reply(&prompt, Some(&options)).await?;

        let call = Self::extract_call(&reply).ok_or_else(|| {
            ChatError::Selection(format!(
                "admin did not call {}; reply was {:?}",
                PICK_FUNCTION,
                reply.content()
            ))
        })?;
        let arguments: PickArguments = serde_json::from_str(&call.arguments)
            .map_err(|e| {
                ChatError::Selection(format!(
                    "could not parse {} arguments {:?}: {}",
                    PICK_FUNCTION, call.arguments, e
                ))
            })?;
        debug!("tool-call admin picked '{}'", arguments.name);

        candidates
            .iter()
            .find(|c| c.name() == arguments.name)
            .map(|c| Some(Arc::clone(c)))
            .ok_or_else(|| {
                ChatError::Selection(format!(
                    "admin picked {:?}, which matches no candidate",
                    arguments.name
                ))
            })
    }
}
