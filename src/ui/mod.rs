mod components;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::sync::OnceLock;

use crate::app::{App, Popup, Section};
use crate::clock::format_relative;
use crate::feed::report::{Report, REPORT_TITLE};
use crate::feed::{AudioFeed, Message};
use crate::theme::Theme;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the palette once at startup; later calls are ignored
pub fn install_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already installed");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

fn accent() -> Color { theme().accent }
fn accent_bright() -> Color { theme().accent_bright }
fn inactive() -> Color { theme().inactive }
fn signal() -> Color { theme().signal }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

const FEED_LIST_WIDTH: u16 = 32;
const FEED_ITEM_HEIGHT: u16 = 2;
const FEED_SUMMARY_HEIGHT: u16 = 13;
const COMPACT_SUMMARY_HEIGHT: u16 = 5;
/// Rows the message list needs before the full summary is worth its space
const MIN_MESSAGE_ROWS: u16 = 10;
const NO_FEED_PROMPT: &str = "Select an audio feed to view intercepted transmissions";

/// Top-level screen regions
struct Areas {
    header: Rect,
    feeds: Rect,
    panel: Rect,
    footer: Rect,
}

fn areas(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Feeds + messages
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FEED_LIST_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    Areas {
        header: chunks[0],
        feeds: main[0],
        panel: main[1],
        footer: chunks[2],
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let areas = areas(f.area());

    draw_header(f, app, areas.header);
    draw_feed_list(f, app, areas.feeds);
    draw_message_panel(f, app, areas.panel);
    draw_footer(f, app, areas.footer);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }
}

/// Index of the feed entry drawn at (`column`, `row`) on a screen of size `area`
pub fn feed_at(area: Rect, column: u16, row: u16, feed_count: usize) -> Option<usize> {
    let list = Block::default().borders(Borders::ALL).inner(areas(area).feeds);
    if !list.contains(Position::new(column, row)) {
        return None;
    }
    let index = usize::from((row - list.y) / FEED_ITEM_HEIGHT);
    (index < feed_count).then_some(index)
}

/// Rows `lines` occupy once word-wrapped to `width`
fn wrapped_height(lines: Vec<Line<'_>>, width: u16) -> u16 {
    let rows = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .line_count(width);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn border_styles(is_active: bool) -> (Style, Style) {
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };
    (Style::default().fg(border_color), title_style)
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" 󰐹 ", Style::default().fg(signal())),
        Span::styled(
            "Intercept Dashboard",
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(title, halves[0]);

    let updated = Paragraph::new(Line::from(vec![
        Span::styled("Last update: ", Style::default().fg(text_dim())),
        Span::styled(
            format_relative(app.last_update, Local::now()),
            Style::default().fg(text()).bg(bg_selected()),
        ),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(updated, halves[1]);
}

fn draw_feed_list(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Feeds;
    let (border_style, title_style) = border_styles(is_active);

    let block = Block::default()
        .title(Span::styled(" Active Feeds ", title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let items: Vec<ListItem> = app
        .catalog
        .feeds()
        .iter()
        .enumerate()
        .map(|(i, feed)| {
            let is_selected = app.selected_feed_id.as_deref() == Some(feed.id.as_str());
            let marker = if is_selected { "▌" } else { " " };
            let name_style = if is_selected {
                Style::default().fg(accent_bright()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text())
            };
            let status_icon = if feed.active { "󰖩" } else { "󰖪" };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(accent_bright())),
                    Span::styled(format!("{} ", i + 1), Style::default().fg(text_dim())),
                    Span::styled("󰐹 ", Style::default().fg(signal())),
                    Span::styled(feed.name.clone(), name_style),
                    Span::styled(format!(" {}", status_icon), Style::default().fg(signal())),
                ]),
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(accent_bright())),
                    Span::styled(format!("  {}", feed.frequency), Style::default().fg(text_dim())),
                    Span::styled(
                        format!("  {}% signal", feed.strength),
                        Style::default().fg(signal()),
                    ),
                ]),
            ])
        })
        .collect();

    let highlight = if is_active {
        Style::default().bg(bg_selected()).fg(text())
    } else {
        Style::default()
    };

    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(app.feed_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_message_panel(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Messages;
    let (border_style, title_style) = border_styles(is_active);

    let block = Block::default()
        .title(Span::styled(" Intercepts ", title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(feed) = app.current_feed() else {
        let prompt_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner)[1];
        let prompt = Paragraph::new(NO_FEED_PROMPT)
            .style(Style::default().fg(text_dim()))
            .alignment(Alignment::Center);
        f.render_widget(prompt, prompt_area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let nav = Paragraph::new(components::breadcrumb(&app.messages.view));
    f.render_widget(nav, chunks[0]);

    if app.messages.is_report() {
        if let Some(report) = app.current_report() {
            draw_report(f, app, &report, chunks[1]);
        }
    } else {
        draw_overview(f, app, feed, chunks[1]);
    }
}

fn draw_overview(f: &mut Frame, app: &App, feed: &AudioFeed, area: Rect) {
    let compact = area.height < FEED_SUMMARY_HEIGHT + MIN_MESSAGE_ROWS;
    let summary_height = if compact {
        COMPACT_SUMMARY_HEIGHT
    } else {
        FEED_SUMMARY_HEIGHT
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(0)])
        .split(area);

    if compact {
        draw_compact_summary(f, feed, chunks[0]);
    } else {
        draw_feed_summary(f, feed, chunks[0]);
    }
    draw_message_list(f, app, chunks[1]);
}

fn summary_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()))
}

/// Badge on the left, name and frequency on the right
fn draw_summary_title(f: &mut Frame, feed: &AudioFeed, area: Rect) {
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(area);
    f.render_widget(Paragraph::new(Line::from(components::priority_badge(feed.priority))), top[0]);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                feed.name.clone(),
                Style::default().fg(text()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {} ", feed.frequency), Style::default().fg(text_dim())),
        ]))
        .alignment(Alignment::Right),
        top[1],
    );
}

fn sentiment_line(feed: &AudioFeed) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {} ", feed.priority.sentiment()), Style::default().fg(text())),
        components::priority_tag(feed.priority),
    ])
}

/// Three-row summary for short terminals; insights stay in the report
fn draw_compact_summary(f: &mut Frame, feed: &AudioFeed, area: Rect) {
    let block = summary_block();
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_summary_title(f, feed, rows[0]);
    f.render_widget(Paragraph::new(sentiment_line(feed)), rows[1]);

    let gauge_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(10), Constraint::Min(0), Constraint::Length(1)])
        .split(rows[2]);
    f.render_widget(
        Paragraph::new("  Signal").style(Style::default().fg(text_dim())),
        gauge_row[0],
    );
    f.render_widget(components::signal_gauge(feed), gauge_row[1]);
}

fn draw_feed_summary(f: &mut Frame, feed: &AudioFeed, area: Rect) {
    let block = summary_block();
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Badge + name
            Constraint::Length(1),
            Constraint::Min(0),    // Analysis columns
        ])
        .split(inner);

    draw_summary_title(f, feed, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let mut analysis = vec![
        components::heading("󰧑", "Sentiment Analysis"),
        sentiment_line(feed),
        Line::from(""),
        components::heading("󰍩", "Feed Insights"),
    ];
    analysis.extend(
        feed.insights
            .iter()
            .map(|insight| components::bullet("→", insight, text())),
    );
    f.render_widget(
        Paragraph::new(analysis).wrap(Wrap { trim: false }),
        columns[0],
    );

    let details = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    f.render_widget(Paragraph::new(components::heading("󰀦", "Feed Details")), details[0]);
    f.render_widget(
        Paragraph::new(format!("  Frequency: {}", feed.frequency)).style(Style::default().fg(text())),
        details[1],
    );
    f.render_widget(
        Paragraph::new(format!("  Signal Strength: {}%", feed.strength))
            .style(Style::default().fg(text())),
        details[2],
    );
    let gauge_area = Rect {
        x: details[3].x + 2,
        width: details[3].width.saturating_sub(3),
        ..details[3]
    };
    f.render_widget(components::signal_gauge(feed), gauge_area);
}

/// Header, body, label and spacer for one intercept
fn message_card(app: &App, message: &Message, is_cursor: bool) -> Vec<Line<'static>> {
    let (body, label, toggle) = if app.messages.is_showing_original(&message.id) {
        (&message.original_text, "Russian Original", "Show Translation")
    } else {
        (&message.translation, "English Translation", "Show Original")
    };

    let row_style = if is_cursor {
        Style::default().bg(bg_selected())
    } else {
        Style::default()
    };
    let pointer = if is_cursor { "▶ " } else { "  " };

    vec![
        Line::from(vec![
            Span::styled(pointer, Style::default().fg(accent())),
            Span::styled(
                message.timestamp.format("%H:%M:%S").to_string(),
                Style::default().fg(text_dim()),
            ),
            Span::styled("  󰈙 Report (r)", Style::default().fg(accent())),
            Span::styled(format!("  {} (t)", toggle), Style::default().fg(accent_bright())),
        ])
        .style(row_style),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(body.clone(), Style::default().fg(text())),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(label, Style::default().fg(text_dim()).add_modifier(Modifier::ITALIC)),
        ]),
        Line::from(""),
    ]
}

fn draw_message_list(f: &mut Frame, app: &App, area: Rect) {
    let messages = app.current_messages();
    let is_active = app.section == Section::Messages;

    if messages.is_empty() {
        let empty = Paragraph::new("  No intercepts on this feed").style(Style::default().fg(text_dim()));
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_top = 0u16;
    let mut cursor_bottom = 0u16;
    for (i, message) in messages.iter().enumerate() {
        let is_cursor = i == app.messages.cursor;
        let card = message_card(app, message, is_cursor && is_active);
        let height = wrapped_height(card.clone(), area.width);
        if is_cursor {
            cursor_top = cursor_bottom;
        }
        if i <= app.messages.cursor {
            cursor_bottom = cursor_bottom.saturating_add(height);
        }
        lines.extend(card);
    }

    // Keep the cursor's card on screen, preferring its first row
    let scroll = cursor_bottom.saturating_sub(area.height).min(cursor_top);

    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(list, area);
}

fn draw_report(f: &mut Frame, app: &App, report: &Report, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            REPORT_TITLE,
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        components::heading("󰋽", "Communication Context"),
    ];
    lines.extend(
        report
            .context_lines()
            .iter()
            .map(|l| components::bullet("•", l, text())),
    );

    lines.push(Line::from(""));
    lines.push(components::heading("󰍡", "Message Content"));
    lines.push(Line::from(Span::styled(
        "  Original Transmission",
        Style::default().fg(text_dim()).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(report.message.original_text.clone(), Style::default().fg(text())),
    ]));
    lines.push(Line::from(Span::styled(
        "  English Translation",
        Style::default().fg(text_dim()).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(report.message.translation.clone(), Style::default().fg(text())),
    ]));

    lines.push(Line::from(""));
    lines.push(components::heading("󰛨", "Key Insights"));
    lines.extend(
        report
            .insights()
            .iter()
            .map(|insight| components::bullet("•", insight, text())),
    );

    lines.push(Line::from(""));
    lines.push(components::heading("󰁔", "Recommendations"));
    lines.extend(
        report
            .recommendations()
            .iter()
            .map(|rec| components::bullet("→", rec, warning())),
    );

    let max_scroll = wrapped_height(lines.clone(), area.width).saturating_sub(area.height);
    app.messages.set_report_scroll_max(max_scroll);
    let scroll = app.messages.report_scroll.min(max_scroll);

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let counters = Line::from(vec![
        Span::styled(" Total Messages: ", Style::default().fg(text_dim())),
        Span::styled(app.config.total_messages.to_string(), Style::default().fg(text())),
        Span::styled(" │ ", Style::default().fg(inactive())),
        Span::styled("Active Connections: ", Style::default().fg(text_dim())),
        Span::styled(app.config.active_connections.to_string(), Style::default().fg(signal())),
    ]);

    // Counters never truncate; the hints take whatever is left
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(u16::try_from(counters.width()).unwrap_or(u16::MAX)),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(Paragraph::new(counters), halves[0]);

    let right = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.clone(), Style::default().fg(warning())))
    } else {
        let hints: &[(&'static str, &'static str)] = match (app.section, app.messages.is_report()) {
            (Section::Feeds, _) => &[("↑↓", "Nav"), ("Enter", "Select"), ("Tab", "Next"), ("?", "Help"), ("q", "Quit")],
            (Section::Messages, false) => &[("↑↓", "Nav"), ("t", "Toggle"), ("r", "Report"), ("Tab", "Next"), ("q", "Quit")],
            (Section::Messages, true) => &[("↑↓", "Scroll"), ("Esc", "Overview"), ("Tab", "Next"), ("q", "Quit")],
        };
        Line::from(components::key_hints(hints))
    };
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), halves[1]);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), Style::default().fg(accent())),
            Span::raw(what),
        ])
    };
    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("═══ {} ═══", title),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        section("Navigation"),
        key("Tab", "Switch between feeds and intercepts"),
        key("↑/↓ j/k", "Move up/down in lists"),
        key("1-9", "Select feed by number"),
        Line::from(""),
        section("Feeds"),
        key("Enter/Space", "Select highlighted feed"),
        Line::from(""),
        section("Intercepts"),
        key("t/Space", "Toggle original / translation"),
        key("r/Enter", "Generate detailed report"),
        key("↑/↓", "Scroll the detailed report"),
        key("Esc/o", "Back to overview"),
        Line::from(""),
        section("Mouse"),
        key("Click", "Select a feed"),
        key("Wheel", "Move or scroll like ↑/↓"),
        Line::from(""),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
