//! Three stub agents taking fixed turns until the round budget runs out.
//!
//! Run with: `RUST_LOG=debug cargo run --example round_robin_chat`

use std::sync::Arc;

use roundtable::message::ChatMessage;
use roundtable::orchestrators::RoundRobinOrchestrator;
use roundtable::{DefaultReplyAgent, GroupChat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let planner = Arc::new(DefaultReplyAgent::new(
        "planner",
        "Here is the plan: gather facts, then summarize.",
    ));
    let researcher = Arc::new(DefaultReplyAgent::new(
        "researcher",
        "Facts gathered: the answer is 42.",
    ));
    let writer = Arc::new(DefaultReplyAgent::new(
        "writer",
        "Summary: according to our research, the answer is 42.",
    ));

    let chat = GroupChat::new(
        vec![planner, researcher, writer],
        Arc::new(RoundRobinOrchestrator),
        vec![ChatMessage::system(
            "You are a small team answering a question together.",
        )],
    )?;

    // Round-robin derives the next speaker from the last message's sender,
    // so the seed question is attributed to a roster member; the cycle then
    // starts at the planner.
    let history = chat
        .call(
            Some(vec![ChatMessage::user("writer", "What is the answer?")]),
            6,
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
