//! Application state and logic

use crate::clock::Clock;
use crate::config::{NavMode, ResolvedTheme, TimingConfig, ViewportConfig};
use pipefolio_core::{
    CharRevealer, LineRevealer, Portfolio, Scheduler, StageContent, StageId, StageStatus,
    StageTracker, TimerId, TimerQueue,
};
use rand::Rng;
use std::time::Duration;

mod navigation;
mod types;
mod viewport;

pub use types::{NavHit, Phase, SectionSpan};
pub(crate) use types::{DESKTOP_NAV_MIN_WIDTH, PROGRESS_RAIL_MIN_WIDTH, PROGRESS_RAIL_WIDTH};
pub use viewport::ScrollViewport;

/// Blink period of the console cursor and status dots
const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// The main application state
pub struct App {
    /// Content being presented
    pub portfolio: Portfolio,
    /// Active and completed stages
    pub tracker: StageTracker,
    /// One console per stage
    logs: Vec<LineRevealer>,
    /// Response typer for the prompt popup
    prompt_typer: CharRevealer,
    /// Stage whose prompt is open
    prompt_stage: Option<StageId>,
    /// Every timer the app owns, on the app's timeline
    timers: TimerQueue,
    /// Scroll state and section visibility
    pub viewport: ScrollViewport,
    /// Startup phase
    pub phase: Phase,
    boot_timer: Option<TimerId>,
    /// Length of the startup splash
    boot: Duration,
    /// Build number shown in the header
    pub build_number: u32,
    /// Resolved theme colors
    pub theme: ResolvedTheme,
    /// Zen mode - hide header, navigation and progress rail
    pub zen_mode: bool,
    /// Whether to show the help popover
    pub show_help: bool,
    /// Navigation style preference
    pub nav_mode: NavMode,
    /// Show the progress rail on wide terminals
    pub progress_rail: bool,
    /// Whether to quit
    pub should_quit: bool,
    /// Wall clock for timestamps
    pub clock: Clock,
    /// Header chips from the last render, for mouse clicks
    pub nav_hits: Vec<NavHit>,
    /// Time since startup as of the last tick
    now: Duration,
}

impl App {
    pub fn new(portfolio: Portfolio, timing: &TimingConfig, viewport: &ViewportConfig) -> Self {
        let tracker = StageTracker::new(portfolio.stage_count(), timing.dwell());
        let logs = portfolio
            .stages
            .iter()
            .map(|stage| LineRevealer::new(stage.logs.clone(), timing.line_interval()))
            .collect();
        let mut timers = TimerQueue::new();
        let boot = timing.boot();
        let boot_timer = (!boot.is_zero()).then(|| timers.schedule(boot));

        let mut app = Self {
            portfolio,
            tracker,
            logs,
            prompt_typer: CharRevealer::new(String::new(), timing.char_interval()),
            prompt_stage: None,
            timers,
            viewport: ScrollViewport::new(
                viewport.inset_rows as usize,
                viewport.threshold,
                timing.scroll(),
            ),
            phase: Phase::Booting,
            boot_timer,
            boot,
            build_number: random_build_number(),
            theme: ResolvedTheme::default(),
            zen_mode: false,
            show_help: false,
            nav_mode: NavMode::Auto,
            progress_rail: true,
            should_quit: false,
            clock: Clock::utc(),
            nav_hits: Vec::new(),
            now: Duration::ZERO,
        };
        if app.boot_timer.is_none() {
            app.finish_boot();
        }
        app
    }

    /// Advance to `now` (time since startup): fire due timers, move the
    /// smooth scroll, and feed visibility changes to the tracker.
    pub fn tick(&mut self, now: Duration) {
        self.now = self.now.max(now);
        self.run_timers();
        self.viewport.step(self.now);
        self.observe_viewport();
        self.sync_logs();
    }

    fn run_timers(&mut self) {
        while let Some(id) = self.timers.pop_expired(self.now) {
            self.dispatch_timer(id);
        }
    }

    fn dispatch_timer(&mut self, id: TimerId) {
        if self.boot_timer == Some(id) {
            self.boot_timer = None;
            self.finish_boot();
            return;
        }
        if self.tracker.on_timer(id, &mut self.timers) {
            return;
        }
        if self.prompt_typer.on_timer(id, &mut self.timers) {
            return;
        }
        for log in &mut self.logs {
            if log.on_timer(id, &mut self.timers) {
                return;
            }
        }
        tracing::warn!(?id, "timer fired with no owner");
    }

    fn observe_viewport(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        for (id, is_intersecting) in self.viewport.observe() {
            self.tracker
                .on_visibility_changed(id, is_intersecting, &mut self.timers);
        }
    }

    /// Only the active stage's console runs, and nothing runs while booting
    fn sync_logs(&mut self) {
        let active = self.tracker.active();
        let ready = self.phase == Phase::Ready;
        for (index, log) in self.logs.iter_mut().enumerate() {
            let visible = ready && StageId::new(index) == active;
            log.set_visible(visible, &mut self.timers);
        }
    }

    /// End the splash and start the pipeline
    pub fn finish_boot(&mut self) {
        if self.phase == Phase::Ready {
            return;
        }
        if let Some(timer) = self.boot_timer.take() {
            self.timers.cancel(timer);
        }
        self.phase = Phase::Ready;
        tracing::info!(stages = self.tracker.len(), "pipeline started");
        self.tracker.finish_loading(&mut self.timers);
        self.observe_viewport();
        self.sync_logs();
    }

    /// Cancel every timer
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.boot_timer.take() {
            self.timers.cancel(timer);
        }
        self.tracker.teardown(&mut self.timers);
        self.prompt_typer.teardown(&mut self.timers);
        for log in &mut self.logs {
            log.teardown(&mut self.timers);
        }
        tracing::debug!(pending = self.pending_timers(), "shut down");
    }

    pub fn is_booting(&self) -> bool {
        self.phase == Phase::Booting
    }

    /// Fraction of the splash elapsed, 0.0 to 1.0
    pub fn boot_progress(&self) -> f32 {
        if self.phase == Phase::Ready || self.boot.is_zero() {
            return 1.0;
        }
        (self.now.as_secs_f32() / self.boot.as_secs_f32()).min(1.0)
    }

    pub fn stage_count(&self) -> usize {
        self.tracker.len()
    }

    pub fn active_stage(&self) -> StageId {
        self.tracker.active()
    }

    pub fn stage_status(&self, id: StageId) -> StageStatus {
        self.tracker.status(id)
    }

    pub fn stage(&self, id: StageId) -> Option<&StageContent> {
        self.portfolio.stage(id)
    }

    pub fn log(&self, id: StageId) -> Option<&LineRevealer> {
        self.logs.get(id.index())
    }

    /// The open prompt popup, if any
    pub fn prompt(&self) -> Option<(StageId, &CharRevealer)> {
        self.prompt_stage.map(|id| (id, &self.prompt_typer))
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// On/off phase for blinking cursors and pulsing dots
    pub fn blink_on(&self) -> bool {
        (self.now.as_millis() / BLINK_PERIOD.as_millis()) % 2 == 0
    }

    /// How long the event loop may sleep before the next timer is due
    pub fn time_until_next_timer(&self, now: Duration) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Number of armed timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

fn random_build_number() -> u32 {
    rand::rng().random_range(100..1100)
}

#[cfg(test)]
mod tests;
