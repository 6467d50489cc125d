//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use blasttui::Color as TileColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Tile colours plus the few UI colours the board screen uses.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours in `TileColor::ALL` order: red, green, blue, yellow, purple, orange.
    pub tiles: [Color; 6],
    /// Board background and gaps between tiles.
    pub bg: Color,
    /// Border.
    pub div_line: Color,
    /// Sidebar text.
    pub main_fg: Color,
    /// Titles and the selection cursor.
    pub title: Color,
    /// Key hints.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const ONEDARK_TILES: [&str; 6] = ["#E06C75", "#98C379", "#61AFEF", "#E5C07B", "#C678DD", "#D19A66"];
const HIGH_CONTRAST_TILES: [&str; 6] = ["#FF0000", "#00FF00", "#0088FF", "#FFFF00", "#FF00FF", "#FF8800"];
/// Tol "bright" scheme, reordered so red/green never carry meaning alone.
const COLORBLIND_TILES: [&str; 6] = ["#EE6677", "#228833", "#4477AA", "#CCBB44", "#AA3377", "#EE7733"];

/// Theme keys tried for each tile colour, in `TileColor::ALL` order.
const TILE_KEYS: [&[&str]; 6] = [
    &["red", "cpu_end", "temp_end"],
    &["green", "mem_box", "cpu_start"],
    &["blue", "cpu_box"],
    &["yellow", "title", "cpu_mid"],
    &["purple", "net_box"],
    &["orange", "proc_misc", "available_end"],
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            tiles: hex_set(&ONEDARK_TILES),
            bg: Color::Rgb(0x28, 0x2C, 0x34),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load a btop-style theme file; missing keys fall back to One Dark.
    /// No path or a missing file gives the default for `palette`.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => {
                let mut t = Self::onedark_default();
                t.apply_palette(palette);
                return Ok(t);
            }
        };
        let s = std::fs::read_to_string(path)?;
        let mut theme = Self::from_map(&parse_theme_file(&s));
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.tiles = hex_set(&HIGH_CONTRAST_TILES);
                self.bg = Color::Black;
            }
            crate::Palette::Colorblind => self.tiles = hex_set(&COLORBLIND_TILES),
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let first = |keys: &[&str]| keys.iter().find_map(|&k| get(k));
        let base = Self::onedark_default();

        let mut tiles = base.tiles;
        for (slot, keys) in tiles.iter_mut().zip(TILE_KEYS) {
            if let Some(c) = first(keys) {
                *slot = c;
            }
        }
        Self {
            tiles,
            bg: first(&["main_bg", "meter_bg"]).unwrap_or(base.bg),
            div_line: get("div_line").unwrap_or(base.div_line),
            main_fg: get("main_fg").unwrap_or(base.main_fg),
            title: get("title").unwrap_or(base.title),
            inactive_fg: get("inactive_fg").unwrap_or(base.inactive_fg),
        }
    }

    #[inline]
    pub fn tile(&self, color: TileColor) -> Color {
        self.tiles[color.index()]
    }
}

/// Built-in hex tables are known-good; a bad entry renders grey.
fn hex_set(hex: &[&str; 6]) -> [Color; 6] {
    hex.map(|h| parse_hex(h).unwrap_or(Color::Gray))
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some((key, rest)) = stripped.split_once(']') else {
            continue;
        };
        let Some((_, value)) = rest.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(s.to_string());
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| bad());
    let (r, g, b) = match s.len() {
        _ if !s.is_ascii() => return Err(bad()),
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(bad()),
    };
    Ok(Color::Rgb(r, g, b))
}
