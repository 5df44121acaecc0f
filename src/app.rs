use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::Cell;
use std::collections::HashSet;
use std::time::Instant;

use crate::config::DashConfig;
use crate::feed::report::Report;
use crate::feed::{AudioFeed, FeedCatalog, FeedError, Message};

/// Seconds before a status message clears itself
const STATUS_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Feeds,
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// What the message panel is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Overview,
    Report { message_id: String },
}

/// Requests flowing up from the panels to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectFeed(String),
    ToggleOriginal(String),
    OpenReport(String),
    BackToOverview,
    Focus(Section),
    ShowHelp,
    CloseHelp,
}

/// State owned by the message/report panel
#[derive(Debug, Clone)]
pub struct MessageView {
    pub view: View,
    pub cursor: usize,
    pub report_scroll: u16,
    // Written by the renderer once the report's wrapped height is known
    report_scroll_max: Cell<u16>,
    showing_original: HashSet<String>,
}

impl Default for MessageView {
    fn default() -> Self {
        Self {
            view: View::Overview,
            cursor: 0,
            report_scroll: 0,
            report_scroll_max: Cell::new(u16::MAX),
            showing_original: HashSet::new(),
        }
    }
}

impl MessageView {
    /// True when the message shows its original text instead of the translation
    pub fn is_showing_original(&self, message_id: &str) -> bool {
        self.showing_original.contains(message_id)
    }

    pub fn toggle(&mut self, message_id: &str) {
        if !self.showing_original.remove(message_id) {
            self.showing_original.insert(message_id.to_string());
        }
    }

    pub fn open_report(&mut self, message_id: &str) {
        self.view = View::Report {
            message_id: message_id.to_string(),
        };
        self.reset_report_scroll();
    }

    pub fn back_to_overview(&mut self) {
        self.view = View::Overview;
        self.reset_report_scroll();
    }

    fn reset_report_scroll(&mut self) {
        self.report_scroll = 0;
        self.report_scroll_max.set(u16::MAX);
    }

    /// Largest useful scroll offset for the report at the current size
    pub fn set_report_scroll_max(&self, max: u16) {
        self.report_scroll_max.set(max);
    }

    fn scroll_report(&mut self, down: bool) {
        self.report_scroll = if down {
            self.report_scroll
                .saturating_add(1)
                .min(self.report_scroll_max.get())
        } else {
            self.report_scroll.saturating_sub(1)
        };
    }

    pub fn is_report(&self) -> bool {
        matches!(self.view, View::Report { .. })
    }

    fn move_down(&mut self, len: usize) {
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

pub struct App {
    pub catalog: FeedCatalog,
    pub config: DashConfig,

    pub section: Section,
    pub popup: Popup,

    // Feed selector
    pub feed_cursor: usize,
    pub selected_feed_id: Option<String>,

    // Message/report panel
    pub messages: MessageView,

    // Refreshed by the timer, display only
    pub last_update: DateTime<Local>,

    // Status message (auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(catalog: FeedCatalog, config: DashConfig) -> Self {
        let mut app = Self {
            catalog,
            config,
            section: Section::Feeds,
            popup: Popup::None,
            feed_cursor: 0,
            selected_feed_id: None,
            messages: MessageView::default(),
            last_update: Local::now(),
            status_message: None,
            status_message_time: None,
        };

        if let Some(feed_id) = app.config.default_feed.clone() {
            app.dispatch(Action::SelectFeed(feed_id));
        }

        app
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Selected feed, or None if nothing (or an unknown id) is selected
    pub fn current_feed(&self) -> Option<&AudioFeed> {
        self.selected_feed_id
            .as_deref()
            .and_then(|id| self.catalog.feed(id))
    }

    pub fn current_messages(&self) -> &[Message] {
        match self.selected_feed_id.as_deref() {
            Some(id) => self.catalog.messages_for(id),
            None => &[],
        }
    }

    /// Message under the panel cursor
    pub fn highlighted_message(&self) -> Option<&Message> {
        self.current_messages().get(self.messages.cursor)
    }

    /// Report for the active report view, if its message still resolves
    pub fn current_report(&self) -> Option<Report<'_>> {
        let View::Report { message_id } = &self.messages.view else {
            return None;
        };
        let feed = self.current_feed()?;
        let message = self
            .current_messages()
            .iter()
            .find(|m| &m.id == message_id)?;
        Some(Report::new(feed, message))
    }

    /// Timer callback: refresh the header timestamp
    pub fn on_refresh(&mut self, at: DateTime<Local>) {
        self.last_update = at;
    }

    /// Housekeeping run on every loop iteration
    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_TIMEOUT_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = self.action_for_key(key) {
            self.dispatch(action);
        }
    }

    fn action_for_key(&self, key: KeyEvent) -> Option<Action> {
        if self.popup == Popup::Help {
            return matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter
            )
            .then_some(Action::CloseHelp);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.section {
                    Section::Feeds => Section::Messages,
                    Section::Messages => Section::Feeds,
                };
                return Some(Action::Focus(next));
            }
            KeyCode::Char('?') | KeyCode::Char('h') => return Some(Action::ShowHelp),
            KeyCode::Char(c @ '1'..='9') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let index = c as usize - '1' as usize;
                return self
                    .catalog
                    .feeds()
                    .get(index)
                    .map(|f| Action::SelectFeed(f.id.clone()));
            }
            _ => {}
        }

        match self.section {
            Section::Feeds => self.feeds_key(key),
            Section::Messages => self.messages_key(key),
        }
    }

    fn feeds_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self
                .catalog
                .feeds()
                .get(self.feed_cursor)
                .map(|f| Action::SelectFeed(f.id.clone())),
            KeyCode::Right | KeyCode::Char('l') if self.current_feed().is_some() => {
                Some(Action::Focus(Section::Messages))
            }
            _ => None,
        }
    }

    fn messages_key(&self, key: KeyEvent) -> Option<Action> {
        if self.messages.is_report() {
            return match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('o') => {
                    Some(Action::BackToOverview)
                }
                _ => None,
            };
        }

        let message_id = self.highlighted_message().map(|m| m.id.clone());
        match key.code {
            KeyCode::Char('t') | KeyCode::Char(' ') => message_id.map(Action::ToggleOriginal),
            KeyCode::Enter | KeyCode::Char('r') => message_id.map(Action::OpenReport),
            KeyCode::Esc | KeyCode::Left => Some(Action::Focus(Section::Feeds)),
            _ => None,
        }
    }

    /// Cursor movement is panel-local and never produces an action
    pub fn handle_navigation(&mut self, key: KeyEvent) -> bool {
        if self.popup != Popup::None {
            return false;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll(true),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(false),
            _ => return false,
        }
        true
    }

    /// Move the focused panel's cursor, or scroll the open report
    pub fn scroll(&mut self, down: bool) {
        match self.section {
            Section::Feeds => {
                let len = self.catalog.feeds().len();
                if down && len > 0 && self.feed_cursor < len - 1 {
                    self.feed_cursor += 1;
                } else if !down {
                    self.feed_cursor = self.feed_cursor.saturating_sub(1);
                }
            }
            Section::Messages if self.messages.is_report() => self.messages.scroll_report(down),
            Section::Messages => {
                let len = self.current_messages().len();
                if down {
                    self.messages.move_down(len);
                } else {
                    self.messages.move_up();
                }
            }
        }
    }

    /// Mouse click on the n-th feed entry
    pub fn click_feed(&mut self, index: usize) {
        if let Some(feed) = self.catalog.feeds().get(index) {
            let feed_id = feed.id.clone();
            self.dispatch(Action::SelectFeed(feed_id));
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::SelectFeed(feed_id) => self.select_feed(feed_id),
            Action::ToggleOriginal(message_id) => self.messages.toggle(&message_id),
            Action::OpenReport(message_id) => {
                if self.current_feed().is_some() {
                    self.messages.open_report(&message_id);
                    self.set_status(format!("Report generated for {}", message_id));
                }
            }
            Action::BackToOverview => self.messages.back_to_overview(),
            Action::Focus(section) => self.section = section,
            Action::ShowHelp => self.popup = Popup::Help,
            Action::CloseHelp => self.popup = Popup::None,
        }
    }

    /// Plain assignment; the panel starts over on every feed change
    fn select_feed(&mut self, feed_id: String) {
        match self.catalog.feeds().iter().position(|f| f.id == feed_id) {
            Some(index) => {
                self.feed_cursor = index;
                self.section = Section::Messages;
            }
            None => tracing::warn!(
                "{}; showing placeholder",
                FeedError::UnknownFeed(feed_id.clone())
            ),
        }

        self.selected_feed_id = Some(feed_id);
        self.messages = MessageView::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixtures;

    fn app() -> App {
        App::new(fixtures::builtin(Local::now()), DashConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        if !app.handle_navigation(key) {
            app.handle_key(key);
        }
    }

    #[test]
    fn test_starts_without_selection() {
        let app = app();
        assert!(app.current_feed().is_none());
        assert!(app.current_messages().is_empty());
        assert_eq!(app.section, Section::Feeds);
    }

    #[test]
    fn test_default_feed_from_config() {
        let config = DashConfig {
            default_feed: Some("2".to_string()),
            ..DashConfig::default()
        };
        let app = App::new(fixtures::builtin(Local::now()), config);
        assert_eq!(app.current_feed().map(|f| f.name.as_str()), Some("Beta Patrol"));
        assert_eq!(app.feed_cursor, 1);
    }

    #[test]
    fn test_select_each_feed() {
        let mut app = app();
        for id in ["1", "2", "3"] {
            app.dispatch(Action::SelectFeed(id.to_string()));
            let feed = app.current_feed().unwrap();
            assert_eq!(feed.id, id);
            assert!(app.current_messages().iter().all(|m| m.feed_id == id));
            assert_eq!(app.current_messages(), app.catalog.messages_for(id));
        }
    }

    #[test]
    fn test_select_unknown_feed_is_placeholder() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("42".to_string()));
        assert_eq!(app.selected_feed_id.as_deref(), Some("42"));
        assert!(app.current_feed().is_none());
        assert!(app.current_messages().is_empty());
        assert!(app.current_report().is_none());
    }

    #[test]
    fn test_keyboard_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_feed_id.as_deref(), Some("2"));
        assert_eq!(app.section, Section::Messages);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected_feed_id.as_deref(), Some("3"));
        assert_eq!(app.feed_cursor, 2);

        // Out of range number keys do nothing
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.selected_feed_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_double_toggle_restores_translation() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("1".to_string()));

        press(&mut app, KeyCode::Char('t'));
        assert!(app.messages.is_showing_original("1-1"));
        assert!(!app.messages.is_showing_original("1-2"));

        press(&mut app, KeyCode::Char('t'));
        assert!(!app.messages.is_showing_original("1-1"));
    }

    #[test]
    fn test_toggle_is_per_message() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("1".to_string()));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));

        assert!(app.messages.is_showing_original("1-2"));
        assert!(!app.messages.is_showing_original("1-1"));
    }

    #[test]
    fn test_report_round_trip() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("1".to_string()));
        press(&mut app, KeyCode::Char('t'));
        let before: Vec<Message> = app.current_messages().to_vec();

        press(&mut app, KeyCode::Enter);
        let report = app.current_report().unwrap();
        assert_eq!(report.message.id, "1-1");
        assert_eq!(report.feed.name, "Alpha Squad");

        // Cursor keys scroll the report instead of moving the cursor
        press(&mut app, KeyCode::Down);
        assert_eq!(app.messages.cursor, 0);
        assert_eq!(app.messages.report_scroll, 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.messages.view, View::Overview);
        assert_eq!(app.messages.report_scroll, 0);
        assert_eq!(app.current_messages(), before.as_slice());
        assert!(app.messages.is_showing_original("1-1"));
    }

    #[test]
    fn test_feed_change_resets_report() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("1".to_string()));
        app.dispatch(Action::OpenReport("1-2".to_string()));
        app.dispatch(Action::ToggleOriginal("1-1".to_string()));
        assert!(app.messages.is_report());

        app.dispatch(Action::SelectFeed("2".to_string()));
        assert_eq!(app.messages.view, View::Overview);
        assert_eq!(app.messages.cursor, 0);
        assert!(!app.messages.is_showing_original("1-1"));
    }

    #[test]
    fn test_report_for_foreign_message_renders_nothing() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("2".to_string()));
        app.dispatch(Action::OpenReport("1-1".to_string()));
        assert!(app.messages.is_report());
        assert!(app.current_report().is_none());
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.popup, Popup::Help);

        press(&mut app, KeyCode::Char('2'));
        assert!(app.selected_feed_id.is_none());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_refresh_only_touches_timestamp() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("3".to_string()));
        let later = app.last_update + chrono::TimeDelta::seconds(5);

        app.on_refresh(later);
        assert_eq!(app.last_update, later);
        assert_eq!(app.selected_feed_id.as_deref(), Some("3"));
        assert_eq!(app.messages.view, View::Overview);
    }

    #[test]
    fn test_report_scroll_is_bounded() {
        let mut app = app();
        app.dispatch(Action::SelectFeed("1".to_string()));
        app.dispatch(Action::OpenReport("1-1".to_string()));
        app.messages.set_report_scroll_max(3);

        for _ in 0..10 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.messages.report_scroll, 3);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.messages.report_scroll, 2);

        // Reopening starts from the top again
        app.dispatch(Action::OpenReport("1-2".to_string()));
        assert_eq!(app.messages.report_scroll, 0);
    }

    #[test]
    fn test_click_feed_selects_it() {
        let mut app = app();
        app.click_feed(2);
        assert_eq!(app.current_feed().map(|f| f.name.as_str()), Some("Delta Force"));
        assert_eq!(app.section, Section::Messages);

        app.click_feed(7);
        assert_eq!(app.selected_feed_id.as_deref(), Some("3"));
    }
}
