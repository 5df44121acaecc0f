//! Dashboard palette
//! Optionally reads colors from ~/.config/omarchy/current/theme/kitty.conf

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

use crate::feed::Priority;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,        // Focused borders, key hints
    pub accent_bright: Color, // Selected feed marker, breadcrumb
    pub danger: Color,        // High priority (red)
    pub warning: Color,       // Medium priority (yellow)
    pub info: Color,          // Low priority (blue)
    pub signal: Color,        // Signal glyphs and strength gauge (emerald)
    pub text: Color,
    pub text_dim: Color,
    pub bg_selected: Color,
    pub inactive: Color,      // Unfocused borders
    pub header: Color,        // Section headings
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(129, 140, 248),
            accent_bright: Color::Rgb(165, 180, 252),
            danger: Color::Rgb(220, 38, 38),
            warning: Color::Rgb(234, 179, 8),
            info: Color::Rgb(59, 130, 246),
            signal: Color::Rgb(16, 185, 129),
            text: Color::Rgb(226, 232, 240),
            text_dim: Color::Rgb(148, 163, 184),
            bg_selected: Color::Rgb(51, 65, 85),
            inactive: Color::Rgb(71, 85, 105),
            header: Color::Rgb(203, 213, 225),
        }
    }
}

impl Theme {
    /// System theme if requested and available, else the built-in palette
    pub fn load(use_system_theme: bool) -> Self {
        if use_system_theme {
            if let Some(theme) = Self::load_omarchy_theme() {
                tracing::debug!("Loaded colors from system theme");
                return theme;
            }
        }
        Self::default()
    }

    /// Color for a priority tier
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.danger,
            Priority::Medium => self.warning,
            Priority::Low => self.info,
        }
    }

    fn load_omarchy_theme() -> Option<Self> {
        let path = dirs::home_dir()?.join(".config/omarchy/current/theme/kitty.conf");
        let content = fs::read_to_string(&path).ok()?;
        Self::from_kitty_conf(&content)
    }

    /// Map kitty's 16-color table onto the palette; None if no colors found
    fn from_kitty_conf(content: &str) -> Option<Self> {
        let colors = Self::parse_kitty_conf(content);
        if colors.is_empty() {
            return None;
        }

        let base = Self::default();
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k))
                .copied()
                .unwrap_or(fallback)
        };

        Some(Self {
            accent: pick(&["color5", "color13"], base.accent),
            accent_bright: pick(&["color13", "color5"], base.accent_bright),
            danger: pick(&["color1", "color9"], base.danger),
            warning: pick(&["color3", "color11"], base.warning),
            info: pick(&["color4", "color12"], base.info),
            signal: pick(&["color2", "color10"], base.signal),
            text: pick(&["foreground"], base.text),
            text_dim: pick(&["color8"], base.text_dim),
            bg_selected: pick(&["selection_background", "color0"], base.bg_selected),
            inactive: pick(&["inactive_border_color", "color8"], base.inactive),
            header: pick(&["color7", "foreground"], base.header),
        })
    }

    /// Parse kitty.conf `key #hexcolor` lines
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once(char::is_whitespace)?;
                let color = Self::parse_hex_color(value)?;
                Some((key.trim().to_string(), color))
            })
            .collect()
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(s.get(range)?, 16).ok();

        match s.len() {
            6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => Some(Color::Rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("red"), None);
        assert_eq!(Theme::parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_kitty_conf_mapping() {
        let conf = "# comment\n\ncolor1 #D35F5F\ncolor4   #3b82f6\nfont_family JetBrains Mono\n";
        let theme = Theme::from_kitty_conf(conf).unwrap();
        assert_eq!(theme.danger, Color::Rgb(211, 95, 95));
        assert_eq!(theme.info, Color::Rgb(59, 130, 246));
        assert_eq!(theme.warning, Theme::default().warning);
    }

    #[test]
    fn test_kitty_conf_without_colors() {
        assert!(Theme::from_kitty_conf("font_size 11\n").is_none());
    }

    #[test]
    fn test_priority_colors_distinct() {
        let theme = Theme::default();
        let high = theme.priority_color(Priority::High);
        let medium = theme.priority_color(Priority::Medium);
        let low = theme.priority_color(Priority::Low);
        assert_ne!(high, medium);
        assert_ne!(medium, low);
        assert_ne!(high, low);
    }
}
