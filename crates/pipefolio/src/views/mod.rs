//! View rendering modules

mod blocks;
mod page;
mod terminal;
pub(crate) mod wrap;

pub use page::build_page;
pub use terminal::CONSOLE_TITLE;

use crate::app::App;
use crate::config::ResolvedTheme;
use pipefolio_core::StageStatus;
use ratatui::style::Color;

/// Per-frame values the page needs besides the app state
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub theme: &'a ResolvedTheme,
    /// Console timestamp, `HH:MM:SS`
    pub clock: String,
    /// Replacement for `@today`
    pub today: String,
    pub blink_on: bool,
}

impl<'a> RenderContext<'a> {
    pub fn from_app(app: &'a App) -> Self {
        Self {
            theme: &app.theme,
            clock: app.clock.time_label(),
            today: app.clock.date_label(),
            blink_on: app.blink_on(),
        }
    }
}

pub fn status_icon(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Success => "✔",
        StageStatus::Running => "▶",
        StageStatus::Pending => "◷",
    }
}

pub fn status_color(status: StageStatus, theme: &ResolvedTheme) -> Color {
    match status {
        StageStatus::Success => theme.success,
        StageStatus::Running => theme.running,
        StageStatus::Pending => theme.pending(),
    }
}

#[cfg(test)]
mod tests;
