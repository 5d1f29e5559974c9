//! Fixed cyclic speaker order.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::agent::Agent;
use crate::error::ChatError;
use crate::orchestrators::{OrchestrationContext, Orchestrator};

/// Selects speakers in roster order, wrapping around after the last.
///
/// Selection is a pure function of the roster and the last message's
/// sender: an empty history picks the first roster member; otherwise the
/// agent after the last speaker (by roster position) speaks next. This
/// orchestrator never returns `Ok(None)`; termination of a round-robin
/// chat comes from the driver's round budget or a terminate-signal message.
///
/// A last message whose sender cannot be found in the roster is a
/// configuration error, raised loudly rather than silently defaulting.
pub struct RoundRobinOrchestrator;

#[async_trait]
impl Orchestrator for RoundRobinOrchestrator {
    async fn next_speaker<'a>(
        &self,
        context: OrchestrationContext<'a>,
    ) -> Result<Option<Arc<dyn Agent>>, ChatError> {
        let last = match context.chat_history.last() {
            Some(last) => last,
            None => return Ok(context.candidates.first().cloned()),
        };

        let sender = last.from().ok_or_else(|| {
            ChatError::Configuration("last message in history has no sender".into())
        })?;
        let position = context
            .candidates
            .iter()
            .position(|a| a.name() == sender)
            .ok_or_else(|| {
                ChatError::Configuration(format!(
                    "last speaker '{}' is not in the roster",
                    sender
                ))
            })?;

        let next = (position + 1) % context.candidates.len();
        debug!(
            "round-robin: '{}' spoke last, '{}' is next",
            sender,
            context.candidates[next].name()
        );
        Ok(Some(Arc::clone(&context.candidates[next])))
    }
}
