mod app;
mod clock;
mod config;
mod feed;
mod theme;
mod ui;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use clock::RefreshTimer;
use config::DashConfig;
use feed::FeedCatalog;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "intercept-dash")]
#[command(version)]
#[command(about = "A terminal dashboard for intercepted audio feeds")]
struct Args {
    /// Start with this feed selected
    #[arg(short, long)]
    feed: Option<String>,

    /// Print the feed catalog as JSON and exit
    #[arg(short, long)]
    list: bool,

    /// Print the detailed report for a message and exit
    #[arg(short, long, value_name = "MESSAGE_ID")]
    report: Option<String>,

    /// Read config from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// How long to wait for input before redrawing
const INPUT_POLL_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stderr and only when asked for; stdout belongs to the TUI
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashConfig::load_from(path),
        None => DashConfig::load(),
    };
    if let Some(feed) = args.feed.clone() {
        config.default_feed = Some(feed);
    }

    let catalog = feed::fixtures::builtin(Local::now());
    tracing::info!(
        "Loaded {} feeds with {} intercepts",
        catalog.feeds().len(),
        catalog.message_count()
    );
    for orphan in catalog.orphaned_messages() {
        tracing::warn!("{}", orphan);
    }

    // Handle CLI-only commands
    if args.list {
        return print_catalog(&catalog);
    }

    if let Some(message_id) = args.report {
        return print_report(&catalog, &message_id);
    }

    run_tui(catalog, config).await
}

fn print_catalog(catalog: &FeedCatalog) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(catalog)?);
    Ok(())
}

fn print_report(catalog: &FeedCatalog, message_id: &str) -> Result<()> {
    let report = catalog.report(message_id)?;
    println!("{}", report.to_plain_text());
    Ok(())
}

async fn run_tui(catalog: FeedCatalog, config: DashConfig) -> Result<()> {
    ui::install_theme(Theme::load(config.use_system_theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog, config);

    // Timer lives exactly as long as the dashboard; dropping it cancels the task
    let mut timer = RefreshTimer::start(app.config.refresh_interval());
    tracing::info!("Dashboard started, refreshing every {}s", timer.period().as_secs());
    let result = run_app(&mut terminal, &mut app, &mut timer);
    drop(timer);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    timer: &mut RefreshTimer,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {
                        if !app.handle_navigation(key) {
                            app.handle_key(key);
                        }
                    }
                },
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(app, mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }

        if let Some(at) = timer.try_latest() {
            app.on_refresh(at);
        }
        app.tick();
    }
}

/// Left click selects a feed; the wheel behaves like ↑/↓
fn handle_mouse(app: &mut App, mouse: MouseEvent, screen: Rect) {
    if app.popup != Popup::None {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) =
                ui::feed_at(screen, mouse.column, mouse.row, app.catalog.feeds().len())
            {
                app.click_feed(index);
            }
        }
        MouseEventKind::ScrollDown => app.scroll(true),
        MouseEventKind::ScrollUp => app.scroll(false),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Action, Section};
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["intercept-dash", "--feed", "2", "-c", "/tmp/dash.toml"]);
        assert_eq!(args.feed.as_deref(), Some("2"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/dash.toml")));
        assert!(!args.list);

        let args = Args::parse_from(["intercept-dash", "--report", "1-1"]);
        assert_eq!(args.report.as_deref(), Some("1-1"));
    }

    #[test]
    fn test_report_for_unknown_message_fails() {
        let catalog = crate::feed::fixtures::builtin(Local::now());
        assert!(print_report(&catalog, "0-0").is_err());
    }

    #[test]
    fn test_catalog_json_shape() {
        let catalog = crate::feed::fixtures::builtin(Local::now());
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["feeds"][0]["name"], "Alpha Squad");
        assert_eq!(json["feeds"][0]["priority"], "high");
        assert_eq!(json["messages"]["2"][0]["id"], "2-1");
    }

    #[test]
    fn test_catalog_json_reads_back() {
        let catalog = crate::feed::fixtures::builtin(Local::now());
        let json = serde_json::to_string_pretty(&catalog).unwrap();
        let back: FeedCatalog = serde_json::from_str(&json).unwrap();

        assert_eq!(back.feeds(), catalog.feeds());
        for feed in catalog.feeds() {
            assert_eq!(back.messages_for(&feed.id), catalog.messages_for(&feed.id));
        }
    }

    #[test]
    fn test_dispatch_select_from_cli_feed() {
        let config = DashConfig {
            default_feed: Some("3".to_string()),
            ..DashConfig::default()
        };
        let mut app = App::new(crate::feed::fixtures::builtin(Local::now()), config);
        assert_eq!(app.current_feed().map(|f| f.name.as_str()), Some("Delta Force"));
        app.dispatch(Action::SelectFeed("1".to_string()));
        assert_eq!(app.current_feed().map(|f| f.name.as_str()), Some("Alpha Squad"));
    }

    #[test]
    fn test_click_selects_feed() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut app = App::new(crate::feed::fixtures::builtin(Local::now()), DashConfig::default());

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 6), screen);
        assert_eq!(app.current_feed().map(|f| f.name.as_str()), Some("Beta Patrol"));
        assert_eq!(app.section, Section::Messages);

        // Clicks outside the feed list change nothing
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 50, 6), screen);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 15), screen);
        assert_eq!(app.selected_feed_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_wheel_scrolls_report() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut app = App::new(crate::feed::fixtures::builtin(Local::now()), DashConfig::default());
        app.dispatch(Action::SelectFeed("1".to_string()));
        app.dispatch(Action::OpenReport("1-1".to_string()));

        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, 50, 10), screen);
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, 50, 10), screen);
        assert_eq!(app.messages.report_scroll, 2);
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 50, 10), screen);
        assert_eq!(app.messages.report_scroll, 1);
    }
}
