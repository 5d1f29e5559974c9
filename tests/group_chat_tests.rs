use std::sync::Arc;

use roundtable::agent::{Agent, DefaultReplyAgent};
use roundtable::error::ChatError;
use roundtable::group_chat::{derive_orchestrator, DEFAULT_MAX_ROUND};
use roundtable::message::{ChatMessage, TERMINATE_MESSAGE};
use roundtable::orchestrators::{OrchestrationContext, Orchestrator, RoundRobinOrchestrator};
use roundtable::transition::{Transition, TransitionGraph};
use roundtable::GroupChat;

fn agent(name: &str, reply: &str) -> Arc<dyn Agent> {
    Arc::new(DefaultReplyAgent::new(name, reply))
}

#[tokio::test]
async fn terminate_signal_halts_the_loop() {
    let first = agent("first", "still thinking");
    let second = agent(
        "second",
        &format!("we are done here {}", TERMINATE_MESSAGE),
    );

    let chat = GroupChat::new(
        vec![first, second],
        Arc::new(RoundRobinOrchestrator),
        Vec::new(),
    )
    .unwrap();

    let history = chat.call(None, 50).await.unwrap();
    // first speaks, then second's terminate reply ends the chat.
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from(), Some("second"));
    assert!(history[1].is_terminate_signal());
}

#[tokio::test]
async fn round_budget_bounds_the_conversation() {
    let chat = GroupChat::new(
        vec![agent("a", "ra"), agent("b", "rb"), agent("c", "rc")],
        Arc::new(RoundRobinOrchestrator),
        Vec::new(),
    )
    .unwrap();

    let seed = vec![ChatMessage::user("a", "kick off")];
    let history = chat.call(Some(seed), 3).await.unwrap();
    // Seed plus exactly three new replies.
    assert_eq!(history.len(), 4);
    assert_eq!(history[1].from(), Some("b"));
    assert_eq!(history[2].from(), Some("c"));
    assert_eq!(history[3].from(), Some("a"));
}

#[tokio::test]
async fn call_default_uses_the_default_round_budget() {
    let chat = GroupChat::new(
        vec![agent("a", "ra"), agent("b", "rb")],
        Arc::new(RoundRobinOrchestrator),
        Vec::new(),
    )
    .unwrap();

    let seed = vec![ChatMessage::user("a", "kick off")];
    let history = chat.call_default(Some(seed)).await.unwrap();
    // Nothing terminates, so the budget is what stops the chat.
    assert_eq!(history.len(), 1 + DEFAULT_MAX_ROUND);
}

#[tokio::test]
async fn duplicate_names_fail_at_construction() {
    let result = GroupChat::new(
        vec![agent("twin", "one"), agent("twin", "two")],
        Arc::new(RoundRobinOrchestrator),
        Vec::new(),
    );
    assert!(matches!(result, Err(ChatError::Configuration(_))));
}

#[tokio::test]
async fn empty_name_fails_at_construction() {
    let result = GroupChat::new(
        vec![agent("", "anonymous")],
        Arc::new(RoundRobinOrchestrator),
        Vec::new(),
    );
    assert!(matches!(result, Err(ChatError::Configuration(_))));
}

#[tokio::test]
async fn workflow_referencing_outsider_fails_at_construction() {
    let teacher = agent("Teacher", "next question");
    let student = agent("Student", "an answer");
    let outsider = agent("Outsider", "not enrolled");

    let mut graph = TransitionGraph::new();
    graph.add_transition(Transition::new(Arc::clone(&teacher), Arc::clone(&outsider)));

    let result = GroupChat::with_admin(vec![teacher, student], None, Vec::new(), Some(graph));
    assert!(matches!(result, Err(ChatError::Configuration(_))));
}

#[tokio::test]
async fn teacher_student_workflow_end_to_end() {
    let teacher = agent("Teacher", "Correct. Next question.");
    let student = agent("Student", "The answer is 4.");

    let mut graph = TransitionGraph::new();
    graph.add_transition(Transition::new(Arc::clone(&teacher), Arc::clone(&student)));
    graph.add_transition(Transition::new(Arc::clone(&student), Arc::clone(&teacher)));

    let chat = GroupChat::with_admin(
        vec![teacher, student],
        None,
        Vec::new(),
        Some(graph),
    )
    .unwrap();

    let seed = vec![ChatMessage::user("Teacher", "Q1: what is 2 + 2?")];
    let history = chat.call(Some(seed), 1).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from(), Some("Student"));
}

#[tokio::test]
async fn introductions_prefix_every_run() {
    let mut chat = GroupChat::new(
        vec![agent("solo", "reply")],
        Arc::new(RoundRobinOrchestrator),
        vec![ChatMessage::system("welcome")],
    )
    .unwrap();
    chat.send_introduction(ChatMessage::user("solo", "hello all"));

    let history = chat.call(None, 1).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].content(), Some("welcome"));
    assert_eq!(history[1].content(), Some("hello all"));
    assert_eq!(history[2].from(), Some("solo"));

    // A second run rebuilds from the same introductions.
    let again = chat.call(None, 1).await.unwrap();
    assert_eq!(again.len(), 3);
}

#[tokio::test]
async fn orchestrator_none_is_normal_termination() {
    let a = agent("a", "ra");
    let b = agent("b", "rb");
    // Only a -> b; once b has spoken the graph offers no successor.
    let mut graph = TransitionGraph::new();
    graph.add_transition(Transition::new(Arc::clone(&a), Arc::clone(&b)));

    let chat = GroupChat::with_admin(
        vec![a, b],
        None,
        Vec::new(),
        Some(graph),
    )
    .unwrap();

    let seed = vec![ChatMessage::user("a", "go")];
    let history = chat.call(Some(seed), 10).await.unwrap();
    // b replies once, then the chat ends without error.
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from(), Some("b"));
}

#[tokio::test]
async fn derive_orchestrator_infers_round_robin_without_admin_or_workflow() {
    let members = vec![agent("x", "rx"), agent("y", "ry")];
    let orchestrator = derive_orchestrator(None, None);

    let history = vec![ChatMessage::assistant("x", "spoke")];
    let next = orchestrator
        .next_speaker(OrchestrationContext {
            candidates: &members,
            chat_history: &history,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.name(), "y");
}

#[tokio::test]
async fn derive_orchestrator_prefers_workflow_over_round_robin() {
    let x = agent("x", "rx");
    let y = agent("y", "ry");
    let mut graph = TransitionGraph::new();
    // Workflow sends x back to itself; round-robin would have picked y.
    graph.add_transition(Transition::new(Arc::clone(&x), Arc::clone(&x)));

    let members = vec![Arc::clone(&x), y];
    let orchestrator = derive_orchestrator(None, Some(graph));

    let history = vec![ChatMessage::assistant("x", "spoke")];
    let next = orchestrator
        .next_speaker(OrchestrationContext {
            candidates: &members,
            chat_history: &history,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.name(), "x");
}
