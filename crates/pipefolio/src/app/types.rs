use pipefolio_core::StageId;
use std::time::Duration;

/// Startup phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Splash screen; the pipeline has not started
    Booting,
    /// Pipeline running, dwell timers armed
    Ready,
}

/// Rows of one section in the scrolled page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionSpan {
    pub start: usize,
    pub height: usize,
}

impl SectionSpan {
    pub fn new(start: usize, height: usize) -> Self {
        Self { start, height }
    }

    pub fn end(&self) -> usize {
        self.start + self.height
    }
}

/// In-flight smooth scroll
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScrollAnimation {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) started: Duration,
    pub(crate) duration: Duration,
}

/// Clickable header chip (x, y, width, height) and the stage it jumps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavHit {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub stage: StageId,
}

impl NavHit {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x.saturating_add(self.width)
            && row >= self.y
            && row < self.y.saturating_add(self.height)
    }
}

/// Terminals narrower than this get the bottom navigation bar
pub(crate) const DESKTOP_NAV_MIN_WIDTH: u16 = 100;
/// Terminals at least this wide show the progress rail
pub(crate) const PROGRESS_RAIL_MIN_WIDTH: u16 = 120;
/// Width of the progress rail column
pub(crate) const PROGRESS_RAIL_WIDTH: u16 = 14;
