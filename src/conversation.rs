//! In-memory conversation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered turns, oldest first, capped at `max_turns`
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Conversation {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_turns: max_turns.max(1),
        }
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatTurn::new(Sender::User, content));
    }

    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.push(ChatTurn::new(Sender::Bot, content));
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Turns in order, as a contiguous vector for providers
    pub fn history(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut conversation = Conversation::default();
        conversation.push_user("hello");
        conversation.push_bot("Hi there!");

        let senders: Vec<Sender> = conversation.turns().map(|t| t.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot]);
        assert_eq!(conversation.history()[1].content, "Hi there!");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut conversation = Conversation::new(2);
        conversation.push_user("one");
        conversation.push_bot("two");
        conversation.push_user("three");

        let contents: Vec<&str> = conversation.turns().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three"]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut conversation = Conversation::new(0);
        conversation.push_user("only");

        assert_eq!(conversation.len(), 1);
        conversation.clear();
        assert!(conversation.is_empty());
    }
}
