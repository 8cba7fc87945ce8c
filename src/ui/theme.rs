use ratatui::style::Color;

use procmon::config::ColorsConfig;

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub gauge_low: Color,
    pub gauge_high: Color,
    pub gauge_unfilled: Color,
    pub selection_bg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub statusbar_bg: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub status_ok: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ColorsConfig::default())
    }
}

impl Theme {
    pub fn from_config(colors: &ColorsConfig) -> Self {
        Theme {
            accent: parse_hex_color(&colors.accent).unwrap_or(Color::Rgb(0x89, 0xb4, 0xfa)),
            gauge_low: parse_hex_color(&colors.gauge_low).unwrap_or(Color::Rgb(0x2d, 0x5a, 0x27)),
            gauge_high: parse_hex_color(&colors.gauge_high).unwrap_or(Color::Rgb(0xa1, 0x2e, 0x2e)),
            gauge_unfilled: Color::Rgb(0x31, 0x32, 0x44),
            selection_bg: parse_hex_color(&colors.selection).unwrap_or(Color::Rgb(0x31, 0x32, 0x44)),
            text_primary: Color::Rgb(0xcd, 0xd6, 0xf4),
            text_secondary: Color::Rgb(0xa6, 0xad, 0xc8),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            statusbar_bg: Color::Rgb(0x18, 0x18, 0x25),
            pill_key_fg: Color::Rgb(0x11, 0x11, 0x1b),
            pill_key_bg: Color::Rgb(0x89, 0xb4, 0xfa),
            pill_desc_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            status_ok: Color::Rgb(0xa6, 0xe3, 0xa1),
        }
    }

    /// Gauge fill: low color below 80%, high color from there on.
    pub fn gauge_color(&self, ratio: f64) -> Color {
        if ratio >= 0.8 {
            self.gauge_high
        } else {
            self.gauge_low
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
