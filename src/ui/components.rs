//! Small building blocks shared by the overview and report views

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Gauge,
};

use super::{accent, accent_bright, header, signal, text, text_dim, theme};
use crate::app::View;
use crate::feed::{AudioFeed, Priority};

/// Solid priority badge, e.g. " HIGH "
pub fn priority_badge(priority: Priority) -> Span<'static> {
    Span::styled(
        format!(" {} ", priority.label()),
        Style::default()
            .bg(theme().priority_color(priority))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

/// Rounded tag, e.g. "(High Priority)"
pub fn priority_tag(priority: Priority) -> Span<'static> {
    Span::styled(
        format!("({} Priority)", priority.title()),
        Style::default().fg(theme().priority_color(priority)),
    )
}

pub fn breadcrumb(view: &View) -> Line<'static> {
    match view {
        View::Overview => Line::from(vec![Span::styled(
            "Overview",
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )]),
        View::Report { .. } => Line::from(vec![
            Span::styled("Overview", Style::default().fg(text_dim())),
            Span::styled(" › ", Style::default().fg(text_dim())),
            Span::styled(
                "Detailed Report",
                Style::default().fg(accent_bright()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   (Esc back)", Style::default().fg(text_dim())),
        ]),
    }
}

pub fn heading(icon: &str, title: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(header())),
        Span::styled(
            title.to_string(),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        ),
    ])
}

pub fn bullet(marker: &str, content: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {} ", marker), Style::default().fg(text_dim())),
        Span::styled(content.to_string(), Style::default().fg(color)),
    ])
}

/// Signal strength bar proportional to the feed's strength
pub fn signal_gauge(feed: &AudioFeed) -> Gauge<'static> {
    Gauge::default()
        .gauge_style(Style::default().fg(signal()).bg(theme().bg_selected))
        .ratio(feed.strength_ratio())
        .label(Span::styled(
            format!("{}%", feed.strength.min(100)),
            Style::default().fg(text()),
        ))
}

/// Key hint pairs rendered as "key action │ ..."
pub fn key_hints(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect()
}
