//! Chart palette
//! Picks up the Omarchy system theme (~/.config/omarchy/current/theme/kitty.conf) when present

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

const DARK_BLUE: Color = Color::Rgb(0x27, 0x26, 0x40);
const TURQUOISE: Color = Color::Rgb(0x40, 0xe0, 0xd0);

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,          // Chart background
    pub bar: Color,         // Grown value
    pub bar_cash: Color,    // Cash contributed, drawn over the grown value
    pub bar_selected: Color,
    pub handle: Color,      // Drag handle stem and ring
    pub accent: Color,      // Focused borders, highlights
    pub text: Color,        // Labels, readout
    pub text_dim: Color,    // Hints, unselected labels
    pub inactive: Color,    // Unfocused borders
    pub warning: Color,     // Status messages
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: DARK_BLUE,
            bar: TURQUOISE,
            bar_cash: Color::Rgb(0x2a, 0x9d, 0x92),
            bar_selected: Color::Rgb(0xaf, 0xff, 0xf4),
            handle: TURQUOISE,
            accent: TURQUOISE,
            text: Color::White,
            text_dim: Color::Rgb(160, 158, 190),
            inactive: Color::Rgb(88, 91, 112),
            warning: Color::Rgb(250, 179, 135),
        }
    }
}

impl Theme {
    pub fn load() -> Self {
        Self::load_omarchy_theme().unwrap_or_default()
    }

    fn load_omarchy_theme() -> Option<Self> {
        let home = dirs::home_dir()?;
        let theme_path = home.join(".config/omarchy/current/theme/kitty.conf");

        let content = fs::read_to_string(&theme_path).ok()?;
        Self::from_kitty_conf(&content)
    }

    /// Map kitty colors onto the chart; `None` when the file has no colors at all
    fn from_kitty_conf(content: &str) -> Option<Self> {
        let colors = Self::parse_kitty_conf(content);
        if colors.is_empty() {
            return None;
        }

        let fallback = Self::default();
        let pick = |keys: &[&str], default: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k).copied())
                .unwrap_or(default)
        };

        // cyan slots carry the bar color; the background stays the theme's own
        let bar = pick(&["color6", "color14"], fallback.bar);
        Some(Self {
            bg: pick(&["background"], fallback.bg),
            bar,
            bar_cash: pick(&["color14", "color6"], fallback.bar_cash),
            bar_selected: pick(&["color15", "foreground"], fallback.bar_selected),
            handle: bar,
            accent: pick(&["color2", "color10"], fallback.accent),
            text: pick(&["foreground"], fallback.text),
            text_dim: pick(&["color8"], fallback.text_dim),
            inactive: pick(&["inactive_border_color", "color8"], fallback.inactive),
            warning: pick(&["color4", "color12"], fallback.warning),
        })
    }

    /// Parse kitty.conf format: `key value` or `key #hexcolor`
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once(char::is_whitespace) {
                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#272640"), Some(DARK_BLUE));
        assert_eq!(Theme::parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("turquoise"), None);
    }

    #[test]
    fn test_kitty_conf_mapping() {
        let conf = "# comment\nforeground #bebebe\nbackground #121212\ncolor6 #00aaaa\n";
        let theme = Theme::from_kitty_conf(conf).unwrap();
        assert_eq!(theme.bar, Color::Rgb(0, 0xaa, 0xaa));
        assert_eq!(theme.handle, theme.bar);
        assert_eq!(theme.bg, Color::Rgb(0x12, 0x12, 0x12));
        assert_eq!(theme.accent, Theme::default().accent);

        assert!(Theme::from_kitty_conf("# nothing here\n").is_none());
    }
}
