//! Built-in mock feeds and intercepts

use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;

use super::{AudioFeed, FeedCatalog, Message, Priority};

/// Age of the older Alpha Squad intercept
const DELAYED_INTERCEPT_MINUTES: i64 = 5;

fn feed(
    id: &str,
    name: &str,
    frequency: &str,
    strength: u8,
    priority: Priority,
    insights: [&str; 3],
) -> AudioFeed {
    AudioFeed {
        id: id.to_string(),
        name: name.to_string(),
        frequency: frequency.to_string(),
        active: true,
        strength,
        priority,
        insights: insights.iter().map(|s| s.to_string()).collect(),
    }
}

fn message(
    id: &str,
    feed_id: &str,
    timestamp: DateTime<Local>,
    original_text: &str,
    translation: &str,
    priority: Priority,
) -> Message {
    Message {
        id: id.to_string(),
        timestamp,
        original_text: original_text.to_string(),
        translation: translation.to_string(),
        priority,
        feed_id: feed_id.to_string(),
    }
}

/// Build the fixture catalog with message timestamps relative to `now`
pub fn builtin(now: DateTime<Local>) -> FeedCatalog {
    let feeds = vec![
        feed(
            "1",
            "Alpha Squad",
            "126.5 MHz",
            85,
            Priority::High,
            [
                "Multiple reinforcement requests detected",
                "Pattern matches pre-offensive communications",
                "High command involvement likely",
            ],
        ),
        feed(
            "2",
            "Beta Patrol",
            "128.2 MHz",
            92,
            Priority::Medium,
            [
                "Routine patrol communications",
                "Supply line coordination ongoing",
                "Standard operational tempo",
            ],
        ),
        feed(
            "3",
            "Delta Force",
            "133.4 MHz",
            78,
            Priority::Low,
            [
                "Maintenance and logistics chatter",
                "Weather-related discussions",
                "No tactical significance detected",
            ],
        ),
    ];

    let mut messages = HashMap::new();
    messages.insert(
        "1".to_string(),
        vec![
            message(
                "1-1",
                "1",
                now,
                "Срочно требуется подкрепление в квадрат 225. Противник наступает.",
                "Urgent reinforcements needed in grid 225. Enemy advancing.",
                Priority::High,
            ),
            message(
                "1-2",
                "1",
                now - Duration::minutes(DELAYED_INTERCEPT_MINUTES),
                "Подтверждаю получение координат. Выдвигаемся.",
                "Coordinates received. Moving out.",
                Priority::High,
            ),
        ],
    );
    messages.insert(
        "2".to_string(),
        vec![message(
            "2-1",
            "2",
            now,
            "Патруль Бета-2 докладывает спокойную обстановку в секторе.",
            "Beta-2 patrol reporting calm conditions in sector.",
            Priority::Medium,
        )],
    );
    messages.insert(
        "3".to_string(),
        vec![message(
            "3-1",
            "3",
            now,
            "Запрашиваем техобслуживание для машины номер 47.",
            "Requesting maintenance for vehicle number 47.",
            Priority::Low,
        )],
    );

    FeedCatalog::new(feeds, messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_feeds() {
        let catalog = builtin(Local::now());
        let names: Vec<&str> = catalog.feeds().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Squad", "Beta Patrol", "Delta Force"]);
        assert!(catalog.feeds().iter().all(|f| f.active && f.insights.len() == 3));

        let alpha = catalog.feed("1").unwrap();
        assert_eq!(alpha.frequency, "126.5 MHz");
        assert_eq!(alpha.strength, 85);
        assert_eq!(alpha.priority, Priority::High);
    }

    #[test]
    fn test_timestamps_relative_to_now() {
        let now = Local::now();
        let catalog = builtin(now);
        assert_eq!(catalog.message("1-1").unwrap().timestamp, now);
        assert_eq!(
            now - catalog.message("1-2").unwrap().timestamp,
            Duration::minutes(5)
        );
    }
}
