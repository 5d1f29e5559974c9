//! A two-agent conversation constrained by a transition graph.
//!
//! The teacher may only hand over to the student and vice versa; the
//! conversation ends when the graph offers no successor or the round budget
//! is spent. Run with: `RUST_LOG=debug cargo run --example workflow_chat`

use std::sync::Arc;

use roundtable::message::ChatMessage;
use roundtable::transition::{Transition, TransitionGraph};
use roundtable::{Agent, DefaultReplyAgent, GroupChat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let teacher: Arc<dyn Agent> = Arc::new(DefaultReplyAgent::new(
        "teacher",
        "Correct! Next question: what is 3 + 3?",
    ));
    let student: Arc<dyn Agent> = Arc::new(DefaultReplyAgent::new("student", "The answer is 6."));

    let mut graph = TransitionGraph::new();
    graph.add_transition(Transition::new(Arc::clone(&teacher), Arc::clone(&student)));
    graph.add_transition(Transition::new(Arc::clone(&student), Arc::clone(&teacher)));

    let chat = GroupChat::with_admin(
        vec![teacher, student],
        None,
        vec![ChatMessage::system("A teacher quizzes a student.")],
        Some(graph),
    )?;

    let history = chat
        .call(
            Some(vec![ChatMessage::user("teacher", "What is 2 + 2?")]),
            4,
        )
        .await?;

    for message in &history {
        println!(
            "{}: {}",
            message.from().unwrap_or("system"),
            message.content().unwrap_or("<non-text>")
        );
    }
    Ok(())
}
