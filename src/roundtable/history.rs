//! History pruning and role-play transcript rendering.
//!
//! These utilities shape the context presented to a selecting LLM. The raw
//! group-chat driver always feeds the full working history to the chosen
//! speaker; pruning only applies where a prompt is constructed from history,
//! i.e. inside the role-play orchestrators.

use crate::message::{ChatMessage, Role};

/// Marker appended after each rendered message in a role-play transcript.
pub const EOF_MESSAGE: &str = "<eof_msg>";

/// Return the suffix of `history` that should be kept when rendering a
/// prompt, honouring clear-signal checkpoints.
///
/// The rule is two passes, applied in order (the first pass changes the
/// basis the second operates on):
///
/// 1. If more than one clear-signal message exists, drop everything before
///    the second-to-last one.
/// 2. On the result, find the last clear-signal message; if it exists and at
///    least two messages remain from it onward (itself included), drop
///    everything before it.
///
/// A history with no clear signals is returned unchanged.
pub fn messages_to_keep(history: &[ChatMessage]) -> &[ChatMessage] {
    let clear_indices: Vec<usize> = history
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_clear_signal())
        .map(|(i, _)| i)
        .collect();

    let mut kept = history;
    if clear_indices.len() > 1 {
        let second_to_last = clear_indices[clear_indices.len() - 2];
        kept = &history[second_to_last..];
    }

    let last_clear = kept
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_clear_signal())
        .map(|(i, _)| i)
        .last();
    if let Some(i) = last_clear {
        if kept.len() - i >= 2 {
            kept = &kept[i..];
        }
    }
    kept
}

/// Render a pruned history as a role-play transcript.
///
/// Each message becomes a new user-role message of the form
/// `From {sender}:\n{content}\n<eof_msg>\nround # {index}`, where `index` is
/// the zero-based position in the rendered sequence. Messages without text
/// render with empty content; messages without a sender render with an empty
/// name, matching the prompt format the selecting LLM is instructed to
/// follow.
pub fn render_role_play_transcript(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let sender = message.from().unwrap_or("");
            let content = message.content().unwrap_or("");
            ChatMessage::Text {
                from: message.from().map(|f| f.to_string()),
                role: Role::User,
                content: format!(
                    "From {}:\n{}\n{}\nround # {}",
                    sender, content, EOF_MESSAGE, index
                ),
            }
        })
        .collect()
}
