//! Refresh clock for the "last update" header
//!
//! `RefreshTimer` owns a background interval task. The task is started
//! when the timer is created and aborted when it is dropped, so tearing
//! down the dashboard never leaves a recurring callback behind.

use chrono::{DateTime, Local, TimeDelta};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct RefreshTimer {
    handle: JoinHandle<()>,
    rx: mpsc::UnboundedReceiver<DateTime<Local>>,
    period: Duration,
}

impl RefreshTimer {
    /// Start ticking every `period` (first tick after one full period)
    pub fn start(period: Duration) -> Self {
        let period = period.max(Duration::from_secs(1));
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(Local::now()).is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Refresh timer started ({}s)", period.as_secs());
        Self { handle, rx, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Drain pending ticks without blocking, returning the newest
    pub fn try_latest(&mut self) -> Option<DateTime<Local>> {
        let mut latest = None;
        while let Ok(ts) = self.rx.try_recv() {
            latest = Some(ts);
        }
        latest
    }

    /// Wait for the next tick
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<DateTime<Local>> {
        self.rx.recv().await
    }

    #[cfg(test)]
    pub fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.handle.abort_handle()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Refresh timer stopped");
    }
}

/// Human-readable distance between `then` and `now`, e.g. "5 minutes ago"
pub fn format_relative(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let delta = now.signed_duration_since(then);
    let distance = describe_distance(delta.abs());

    if delta < TimeDelta::zero() {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn describe_distance(delta: TimeDelta) -> String {
    let secs = delta.num_seconds();
    // Round to the nearest minute (30s and up rounds up)
    let minutes = (secs + 30) / 60;
    let months = (minutes + 21600) / 43200;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..=44 => format!("{} minutes", minutes),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {} hours", (minutes + 30) / 60),
        1440..=2519 => "1 day".to_string(),
        2520..=43199 => format!("{} days", (minutes + 720) / 1440),
        43200..=86399 => format!("about {} month{}", months, plural(months)),
        _ if months < 12 => format!("{} months", months),
        _ => {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {} year{}", years, plural(years)),
                3..=8 => format!("over {} year{}", years, plural(years)),
                _ => format!("almost {} years", years + 1),
            }
        }
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
