//! Feed and message model
//!
//! Feeds are simulated radio channels; each owns an ordered list of
//! intercepted messages. Everything here is built once at startup and
//! never mutated afterwards.

pub mod fixtures;
pub mod report;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("unknown feed: {0}")]
    UnknownFeed(String),

    #[error("unknown message: {0}")]
    UnknownMessage(String),

    #[error("message {message_id} references missing feed {feed_id}")]
    OrphanedMessage { message_id: String, feed_id: String },
}

/// Priority tier shared by feeds and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Badge text, e.g. "HIGH"
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    /// Tag text, e.g. "High"
    pub fn title(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Canned tone description derived from the tier alone
    pub fn sentiment(self) -> &'static str {
        match self {
            Priority::High => "Urgent command tone detected",
            Priority::Medium => "Standard operational communication",
            Priority::Low => "Routine maintenance chatter",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeed {
    pub id: String,
    pub name: String,
    pub frequency: String,  // Free-form label, e.g. "126.5 MHz"
    pub active: bool,
    pub strength: u8,       // Signal quality 0-100
    pub priority: Priority,
    pub insights: Vec<String>,
}

impl AudioFeed {
    /// Signal strength as a 0.0..=1.0 ratio (for gauges)
    pub fn strength_ratio(&self) -> f64 {
        f64::from(self.strength.min(100)) / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub original_text: String,
    pub translation: String,
    pub priority: Priority,
    pub feed_id: String,
}

/// All feeds plus their messages, keyed by feed id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedCatalog {
    feeds: Vec<AudioFeed>,
    messages: HashMap<String, Vec<Message>>,
}

impl FeedCatalog {
    pub fn new(feeds: Vec<AudioFeed>, messages: HashMap<String, Vec<Message>>) -> Self {
        Self { feeds, messages }
    }

    pub fn feeds(&self) -> &[AudioFeed] {
        &self.feeds
    }

    pub fn feed(&self, id: &str) -> Option<&AudioFeed> {
        self.feeds.iter().find(|f| f.id == id)
    }

    /// Messages for a feed in fixture order (empty for unknown ids)
    pub fn messages_for(&self, feed_id: &str) -> &[Message] {
        self.messages
            .get(feed_id)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Look a message up by id across all feeds
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages
            .values()
            .flat_map(|list| list.iter())
            .find(|m| m.id == message_id)
    }

    pub fn message_count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Messages whose `feed_id` does not match any known feed
    pub fn orphaned_messages(&self) -> Vec<FeedError> {
        let mut orphans: Vec<FeedError> = self
            .messages
            .values()
            .flat_map(|list| list.iter())
            .filter(|m| self.feed(&m.feed_id).is_none())
            .map(|m| FeedError::OrphanedMessage {
                message_id: m.id.clone(),
                feed_id: m.feed_id.clone(),
            })
            .collect();

        // HashMap order is arbitrary; keep output stable
        orphans.sort_by(|a, b| format!("{a}").cmp(&format!("{b}")));
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FeedCatalog {
        fixtures::builtin(Local::now())
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::High.label(), "HIGH");
        assert_eq!(Priority::Medium.title(), "Medium");
        assert_eq!(Priority::Low.as_str(), "low");
        assert_eq!(Priority::Low.sentiment(), "Routine maintenance chatter");
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Priority::High);
    }

    #[test]
    fn test_lookup_known_and_unknown_feed() {
        let catalog = catalog();
        assert_eq!(catalog.feed("2").map(|f| f.name.as_str()), Some("Beta Patrol"));
        assert!(catalog.feed("99").is_none());
        assert!(catalog.messages_for("99").is_empty());
    }

    #[test]
    fn test_messages_keep_fixture_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.messages_for("1").iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1-1", "1-2"]);
        assert!(catalog.messages_for("1").iter().all(|m| m.feed_id == "1"));
    }

    #[test]
    fn test_message_lookup_across_feeds() {
        let catalog = catalog();
        assert_eq!(catalog.message("3-1").map(|m| m.feed_id.as_str()), Some("3"));
        assert!(catalog.message("4-1").is_none());
        assert_eq!(catalog.message_count(), 4);
    }

    #[test]
    fn test_orphaned_messages_detected() {
        let mut catalog = catalog();
        assert!(catalog.orphaned_messages().is_empty());

        let mut stray = catalog.messages_for("1")[0].clone();
        stray.id = "9-1".to_string();
        stray.feed_id = "9".to_string();
        catalog.messages.insert("9".to_string(), vec![stray]);

        assert_eq!(
            catalog.orphaned_messages(),
            vec![FeedError::OrphanedMessage {
                message_id: "9-1".to_string(),
                feed_id: "9".to_string(),
            }]
        );
    }

    #[test]
    fn test_strength_ratio_clamped() {
        let mut feed = catalog().feeds()[0].clone();
        assert!((feed.strength_ratio() - 0.85).abs() < f64::EPSILON);
        feed.strength = 250;
        assert!((feed.strength_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
