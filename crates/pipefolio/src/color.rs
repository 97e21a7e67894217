//! Color parsing, theme token resolution and badge palettes.

use pipefolio_core::content::BadgeColor;
use ratatui::style::Color;
use std::collections::HashMap;

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL color (h: 0-360, s: 0-1, l: 0-1)
#[derive(Debug, Clone, Copy)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Parse hex color string (e.g., "#2ecc71" or "2ecc71")
pub fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 {
        return Err(format!(
            "invalid hex color: expected 6 characters, got {}",
            s.len()
        ));
    }

    let r = u8::from_str_radix(&s[0..2], 16)
        .map_err(|_| format!("invalid hex color: bad red component in '{}'", s))?;
    let g = u8::from_str_radix(&s[2..4], 16)
        .map_err(|_| format!("invalid hex color: bad green component in '{}'", s))?;
    let b = u8::from_str_radix(&s[4..6], 16)
        .map_err(|_| format!("invalid hex color: bad blue component in '{}'", s))?;

    Ok(Rgb { r, g, b })
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f32::EPSILON {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h
    } else if (max - g).abs() < f32::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: (h * 60.0).rem_euclid(360.0),
        s: s.clamp(0.0, 1.0),
        l: l.clamp(0.0, 1.0),
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0);
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    if s.abs() < f32::EPSILON {
        let v = (l * 255.0).round() as u8;
        return Rgb { r: v, g: v, b: v };
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
        t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let h_norm = h / 360.0;
    Rgb {
        r: (hue_to_rgb(p, q, h_norm + 1.0 / 3.0) * 255.0).round() as u8,
        g: (hue_to_rgb(p, q, h_norm) * 255.0).round() as u8,
        b: (hue_to_rgb(p, q, h_norm - 1.0 / 3.0) * 255.0).round() as u8,
    }
}

/// Ease-out curve: fast start, slow end
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(2)
}

/// Parse ANSI color name to ratatui Color
pub fn parse_ansi_name(name: &str) -> Option<Color> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "default" | "reset" => Some(Color::Reset),
        "transparent" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// Resolve a color string: def reference, hex, or ANSI name
pub fn resolve_color(value: &str, defs: &HashMap<String, String>) -> Option<Color> {
    let value = value.trim();

    if let Some(hex) = defs.get(value) {
        return parse_hex(hex)
            .ok()
            .map(|rgb| Color::Rgb(rgb.r, rgb.g, rgb.b));
    }

    if value.starts_with('#') {
        return parse_hex(value)
            .ok()
            .map(|rgb| Color::Rgb(rgb.r, rgb.g, rgb.b));
    }

    parse_ansi_name(value)
}

/// Derive a dimmed version of a color via HSL (reduce saturation and lightness)
pub fn dim_color(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let mut hsl = rgb_to_hsl(Rgb { r, g, b });
            hsl.s *= 0.4;
            hsl.l *= 0.6;
            let dimmed = hsl_to_rgb(hsl);
            Color::Rgb(dimmed.r, dimmed.g, dimmed.b)
        }
        Color::Green | Color::LightGreen => Color::DarkGray,
        Color::Red | Color::LightRed => Color::DarkGray,
        Color::Yellow | Color::LightYellow => Color::DarkGray,
        Color::Cyan | Color::LightCyan => Color::DarkGray,
        Color::Blue | Color::LightBlue => Color::DarkGray,
        Color::Magenta | Color::LightMagenta => Color::DarkGray,
        Color::White | Color::Gray => Color::DarkGray,
        _ => color,
    }
}

/// Solid badge fill (tailwind 600 shades)
pub fn badge_fill(color: BadgeColor) -> Color {
    match color {
        BadgeColor::Blue => Color::Rgb(0x25, 0x63, 0xeb),
        BadgeColor::Green => Color::Rgb(0x16, 0xa3, 0x4a),
        BadgeColor::Orange => Color::Rgb(0xea, 0x58, 0x0c),
        BadgeColor::Purple => Color::Rgb(0x93, 0x33, 0xea),
        BadgeColor::Red => Color::Rgb(0xdc, 0x26, 0x26),
        BadgeColor::Yellow => Color::Rgb(0xca, 0x8a, 0x04),
        BadgeColor::Gray => Color::Rgb(0x4b, 0x55, 0x63),
    }
}

/// Foreground accent for text on a dark background (tailwind 400 shades)
pub fn badge_text(color: BadgeColor) -> Color {
    match color {
        BadgeColor::Blue => Color::Rgb(0x60, 0xa5, 0xfa),
        BadgeColor::Green => Color::Rgb(0x4a, 0xde, 0x80),
        BadgeColor::Orange => Color::Rgb(0xfb, 0x92, 0x3c),
        BadgeColor::Purple => Color::Rgb(0xc0, 0x84, 0xfc),
        BadgeColor::Red => Color::Rgb(0xf8, 0x71, 0x71),
        BadgeColor::Yellow => Color::Rgb(0xfa, 0xcc, 0x15),
        BadgeColor::Gray => Color::Rgb(0x9c, 0xa3, 0xaf),
    }
}
