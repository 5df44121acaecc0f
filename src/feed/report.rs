//! Detailed analysis report for a single intercept
//!
//! The report is a fixed template filled from the message and its owning
//! feed. Both the TUI report view and `--report` render from this value.

use super::{AudioFeed, FeedCatalog, FeedError, Message};

pub const REPORT_TITLE: &str = "Detailed Analysis Report";

pub const RECOMMENDATIONS: [&str; 3] = [
    "Continue monitoring this frequency for follow-up communications",
    "Cross-reference with other intelligence sources",
    "Update relevant command structures based on priority level",
];

/// Local date-time format used in report context
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub feed: &'a AudioFeed,
    pub message: &'a Message,
}

impl<'a> Report<'a> {
    pub fn new(feed: &'a AudioFeed, message: &'a Message) -> Self {
        Self { feed, message }
    }

    /// "Communication Context" bullet lines
    pub fn context_lines(&self) -> Vec<String> {
        vec![
            format!("Feed Source: {} ({})", self.feed.name, self.feed.frequency),
            format!("Signal Quality: {}% strength", self.feed.strength),
            format!("Priority Level: {}", self.feed.priority.label()),
            format!(
                "Timestamp: {}",
                self.message.timestamp.format(TIMESTAMP_FORMAT)
            ),
        ]
    }

    pub fn insights(&self) -> &[String] {
        &self.feed.insights
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        &RECOMMENDATIONS
    }

    /// Plain-text rendition for terminals and pipes
    pub fn to_plain_text(&self) -> String {
        let mut out = Vec::new();
        out.push(REPORT_TITLE.to_string());
        out.push("=".repeat(REPORT_TITLE.len()));
        out.push(String::new());

        out.push("Communication Context".to_string());
        out.extend(self.context_lines().into_iter().map(|l| format!("  • {}", l)));
        out.push(String::new());

        out.push("Message Content".to_string());
        out.push("  Original Transmission:".to_string());
        out.push(format!("    {}", self.message.original_text));
        out.push("  English Translation:".to_string());
        out.push(format!("    {}", self.message.translation));
        out.push(String::new());

        out.push("Key Insights".to_string());
        out.extend(self.insights().iter().map(|i| format!("  • {}", i)));
        out.push(String::new());

        out.push("Recommendations".to_string());
        out.extend(self.recommendations().iter().map(|r| format!("  → {}", r)));

        out.join("\n")
    }
}

impl FeedCatalog {
    /// Build the report for a message id, resolving its owning feed
    pub fn report(&self, message_id: &str) -> Result<Report<'_>, FeedError> {
        let message = self
            .message(message_id)
            .ok_or_else(|| FeedError::UnknownMessage(message_id.to_string()))?;
        let feed = self
            .feed(&message.feed_id)
            .ok_or_else(|| FeedError::OrphanedMessage {
                message_id: message.id.clone(),
                feed_id: message.feed_id.clone(),
            })?;
        Ok(Report::new(feed, message))
    }
}
