//! Configuration file support for pipefolio
//!
//! Config file location: `~/.config/pipefolio/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [ui]
//! zen = false
//! nav = "auto"          # auto, desktop or mobile
//! progress_rail = true
//! build_number = 421    # random when unset
//!
//! [ui.theme]
//! name = "jenkins"      # jenkins, github, gitlab, ansi
//! mode = "dark"
//!
//! [ui.theme.defs]
//! brand = "#ff5555"
//!
//! [ui.theme.theme.accent]
//! dark = "brand"
//!
//! [timing]
//! dwell_ms = 600
//! line_interval_ms = 800
//! char_interval_ms = 30
//! boot_ms = 1200
//! scroll_ms = 300
//!
//! [viewport]
//! inset_rows = 2
//! threshold = 0.5
//!
//! [content]
//! path = "~/portfolio.toml"
//! ```

use crate::color;
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Theme Configuration
// ============================================================================

/// Dark/light color pair for a theme token
#[derive(Debug, Clone, Deserialize)]
pub struct DarkLight {
    pub dark: String,
    #[serde(default)]
    pub light: Option<String>,
}

/// Theme tokens
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeTokens {
    pub text: Option<DarkLight>,
    pub text_muted: Option<DarkLight>,
    pub primary: Option<DarkLight>,
    pub accent: Option<DarkLight>,
    pub success: Option<DarkLight>,
    pub running: Option<DarkLight>,
    pub warning: Option<DarkLight>,
    pub error: Option<DarkLight>,
    pub background: Option<DarkLight>,
    pub background_panel: Option<DarkLight>,
    pub border: Option<DarkLight>,
    pub border_active: Option<DarkLight>,
    pub console: Option<DarkLight>,
}

/// Theme configuration (defs + tokens)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Built-in theme name (e.g., "jenkins")
    pub name: Option<String>,
    /// Theme mode: "dark" or "light"
    pub mode: Option<String>,
    /// Named color definitions (e.g., green400 = "#4ade80")
    pub defs: HashMap<String, String>,
    /// Theme tokens with dark/light values
    pub theme: ThemeTokens,
}

pub const DEFAULT_THEME: &str = "jenkins";

pub const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("ansi", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/themes/ansi.json"))),
    ("github", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/themes/github.json"))),
    ("gitlab", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/themes/gitlab.json"))),
    ("jenkins", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/themes/jenkins.json"))),
];

macro_rules! merge_tokens {
    ($base:expr, $overlay:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $overlay.$field.is_some() {
                $base.$field = $overlay.$field.clone();
            }
        )*
    };
}

impl ThemeConfig {
    /// Check if config specifies light mode
    pub fn is_light_mode(&self) -> bool {
        self.mode
            .as_ref()
            .map(|m| m.eq_ignore_ascii_case("light"))
            .unwrap_or(false)
    }

    /// Built-in base (named theme, or the default) with this config layered on top
    fn resolved_config(&self) -> ThemeConfig {
        let name = self.name.as_deref().unwrap_or(DEFAULT_THEME);
        let mut base = ThemeConfig::builtin(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            ThemeConfig::builtin(DEFAULT_THEME).unwrap_or_default()
        });

        base.name = self.name.clone();
        if self.mode.is_some() {
            base.mode = self.mode.clone();
        }
        base.defs.extend(self.defs.clone());
        merge_tokens!(
            base.theme,
            self.theme,
            [
                text,
                text_muted,
                primary,
                accent,
                success,
                running,
                warning,
                error,
                background,
                background_panel,
                border,
                border_active,
                console,
            ]
        );
        base
    }

    fn builtin(name: &str) -> Option<ThemeConfig> {
        let key = name.to_ascii_lowercase();
        let json = BUILTIN_THEMES
            .iter()
            .find(|(theme_name, _)| *theme_name == key)
            .map(|(_, json)| *json)?;
        match serde_json::from_str::<ThemeConfig>(json) {
            Ok(mut config) => {
                config.name = Some(key);
                Some(config)
            }
            Err(err) => {
                tracing::error!(theme = %key, %err, "builtin theme failed to parse");
                None
            }
        }
    }

    /// Resolve theme config to concrete colors
    /// If light_mode is true, prefers .light values, falls back to .dark
    pub fn resolve(&self, light_mode: bool) -> ResolvedTheme {
        let merged = self.resolved_config();
        let defs = &merged.defs;
        let tokens = &merged.theme;

        let resolve = |token: &Option<DarkLight>, fallback: Color| -> Color {
            token
                .as_ref()
                .and_then(|dl| {
                    if light_mode {
                        dl.light
                            .as_ref()
                            .and_then(|v| color::resolve_color(v, defs))
                            .or_else(|| color::resolve_color(&dl.dark, defs))
                    } else {
                        color::resolve_color(&dl.dark, defs)
                    }
                })
                .unwrap_or(fallback)
        };

        // None = transparent
        let resolve_bg = |token: &Option<DarkLight>| -> Option<Color> {
            token.as_ref().and_then(|dl| {
                let value_str = if light_mode {
                    dl.light.as_ref().unwrap_or(&dl.dark)
                } else {
                    &dl.dark
                };
                let value = value_str.trim().to_lowercase();
                if value == "transparent" || value == "none" {
                    None
                } else {
                    color::resolve_color(value_str, defs)
                }
            })
        };

        let accent = resolve(&tokens.accent, Color::Red);

        ResolvedTheme {
            text: resolve(&tokens.text, Color::Reset),
            text_muted: resolve(&tokens.text_muted, Color::DarkGray),
            primary: resolve(&tokens.primary, Color::White),
            accent,
            success: resolve(&tokens.success, Color::Green),
            running: resolve(&tokens.running, Color::Blue),
            warning: resolve(&tokens.warning, Color::Yellow),
            error: resolve(&tokens.error, Color::Red),
            background: resolve_bg(&tokens.background),
            background_panel: resolve_bg(&tokens.background_panel),
            border: resolve(&tokens.border, Color::DarkGray),
            border_active: resolve(&tokens.border_active, accent),
            console: resolve(&tokens.console, Color::Green),
        }
    }
}

/// Resolved theme with every token as a ratatui Color
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub text: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,

    pub success: Color,
    pub running: Color,
    pub warning: Color,
    pub error: Color,

    // Backgrounds (None = transparent)
    pub background: Option<Color>,
    pub background_panel: Option<Color>,

    pub border: Color,
    pub border_active: Color,

    /// Console log text
    pub console: Color,
}

impl ResolvedTheme {
    /// Pending stages are drawn in the muted text color
    pub fn pending(&self) -> Color {
        self.text_muted
    }

    /// Dimmed success color for the off phase of pulsing indicators
    pub fn success_dim(&self) -> Color {
        color::dim_color(self.success)
    }
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve(false)
    }
}

/// Which navigation bar to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavMode {
    /// Desktop chips when they fit, bottom bar otherwise
    #[default]
    Auto,
    Desktop,
    Mobile,
}

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start in zen mode (content only)
    pub zen: bool,
    /// Navigation style
    pub nav: NavMode,
    /// Show the pipeline progress rail on wide terminals
    pub progress_rail: bool,
    /// Fixed build number for the header (random when unset)
    pub build_number: Option<u32>,
    /// Theme configuration
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            zen: false,
            nav: NavMode::Auto,
            progress_rail: true,
            build_number: None,
            theme: ThemeConfig::default(),
        }
    }
}

/// Animation and dwell timing, all in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a stage must stay active before it counts as completed
    pub dwell_ms: u64,
    /// Delay between console log lines
    pub line_interval_ms: u64,
    /// Delay between typed characters in the prompt popup
    pub char_interval_ms: u64,
    /// Length of the startup splash (0 skips it)
    pub boot_ms: u64,
    /// Duration of the smooth scroll to a stage
    pub scroll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 600,
            line_interval_ms: 800,
            char_interval_ms: 30,
            boot_ms: 1200,
            scroll_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn line_interval(&self) -> Duration {
        Duration::from_millis(self.line_interval_ms.max(1))
    }

    pub fn char_interval(&self) -> Duration {
        Duration::from_millis(self.char_interval_ms.max(1))
    }

    pub fn boot(&self) -> Duration {
        Duration::from_millis(self.boot_ms)
    }

    pub fn scroll(&self) -> Duration {
        Duration::from_millis(self.scroll_ms)
    }
}

/// Visibility detection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Rows trimmed from the top and bottom of the view before measuring
    pub inset_rows: u16,
    /// Fraction of a section that must be inside the band to count as in view
    pub threshold: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            inset_rows: 2,
            threshold: 0.5,
        }
    }
}

/// Where the portfolio content comes from
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Portfolio TOML file; the built-in portfolio when unset
    pub path: Option<PathBuf>,
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub timing: TimingConfig,
    pub viewport: ViewportConfig,
    pub content: ContentConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("pipefolio").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("pipefolio").join("config.toml"));
        }

        // Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("pipefolio").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from the first existing config path.
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read config");
                return Self::default();
            }
        };
        match Self::parse(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                eprintln!("Warning: Failed to parse config: {}", err);
                tracing::warn!(path = %path.display(), %err, "failed to parse config");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Content path with a leading `~/` expanded
    pub fn content_path(&self) -> Option<PathBuf> {
        let path = self.content.path.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(!config.ui.zen);
        assert_eq!(config.ui.nav, NavMode::Auto);
        assert_eq!(config.timing.dwell(), Duration::from_millis(600));
        assert_eq!(config.timing.line_interval(), Duration::from_millis(800));
        assert_eq!(config.timing.char_interval(), Duration::from_millis(30));
        assert_eq!(config.viewport.inset_rows, 2);
        assert!(config.content.path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            "[ui]\nnav = \"mobile\"\nbuild_number = 7\n[timing]\ndwell_ms = 2000\n",
        )
        .unwrap();
        assert_eq!(config.ui.nav, NavMode::Mobile);
        assert_eq!(config.ui.build_number, Some(7));
        assert!(config.ui.progress_rail);
        assert_eq!(config.timing.dwell_ms, 2000);
        assert_eq!(config.timing.line_interval_ms, 800);
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config = Config::parse("[timing]\nline_interval_ms = 0\nchar_interval_ms = 0\n").unwrap();
        assert_eq!(config.timing.line_interval(), Duration::from_millis(1));
        assert_eq!(config.timing.char_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_nav_rejected() {
        assert!(Config::parse("[ui]\nnav = \"sideways\"\n").is_err());
    }

    #[test]
    fn test_builtin_themes_parse() {
        for (name, _) in BUILTIN_THEMES {
            assert!(ThemeConfig::builtin(name).is_some(), "theme {name} failed");
        }
    }

    #[test]
    fn test_default_theme_is_jenkins() {
        let theme = ResolvedTheme::default();
        assert_eq!(theme.accent, Color::Rgb(0xef, 0x44, 0x44));
        assert_eq!(theme.console, Color::Rgb(0x4a, 0xde, 0x80));
    }

    #[test]
    fn test_theme_overrides_layer_on_builtin() {
        let config = Config::parse(
            "[ui.theme]\nname = \"github\"\n[ui.theme.defs]\nbrand = \"#010203\"\n[ui.theme.theme.accent]\ndark = \"brand\"\n",
        )
        .unwrap();
        let theme = config.ui.theme.resolve(false);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.success, Color::Rgb(0x3f, 0xb9, 0x50));
    }

    #[test]
    fn test_light_mode_falls_back_to_dark() {
        let config = Config::parse("[ui.theme]\nname = \"ansi\"\nmode = \"light\"\n").unwrap();
        assert!(config.ui.theme.is_light_mode());
        let theme = config.ui.theme.resolve(true);
        assert_eq!(theme.primary, Color::Black);
        assert_eq!(theme.success, Color::Green);
        assert_eq!(theme.background, None);
    }
}
