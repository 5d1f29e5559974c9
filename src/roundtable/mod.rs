// src/roundtable/mod.rs

pub mod agent;
pub mod error;
pub mod group_chat;
pub mod history;
pub mod message;
pub mod middleware;
pub mod orchestrators;
pub mod transition;

// Explicitly export the driver so callers reach it as roundtable::GroupChat
// instead of roundtable::group_chat::GroupChat.
pub use group_chat::GroupChat;
