//! Typewriter effects for the pipeline console
//!
//! Both revealers share one rule: while visible they show one more unit per
//! tick until everything is out, and hiding throws the progress away. There is
//! no resuming a half-typed log after it scrolled out of view.

use crate::scheduler::{Scheduler, TimerId};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Tick-driven prefix counter shared by the revealers
#[derive(Debug)]
struct Reveal {
    total: usize,
    shown: usize,
    visible: bool,
    interval: Duration,
    timer: Option<TimerId>,
}

impl Reveal {
    fn new(total: usize, interval: Duration) -> Self {
        Self {
            total,
            shown: 0,
            visible: false,
            interval,
            timer: None,
        }
    }

    fn set_visible(&mut self, visible: bool, scheduler: &mut dyn Scheduler) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.restart(scheduler);
    }

    fn reset_total(&mut self, total: usize, scheduler: &mut dyn Scheduler) {
        self.total = total;
        self.restart(scheduler);
    }

    fn restart(&mut self, scheduler: &mut dyn Scheduler) {
        self.cancel(scheduler);
        self.shown = 0;
        if self.visible && self.total > 0 {
            self.timer = Some(scheduler.schedule(self.interval));
        }
    }

    fn on_timer(&mut self, timer: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.timer = None;
        self.shown = (self.shown + 1).min(self.total);
        if self.shown < self.total {
            self.timer = Some(scheduler.schedule(self.interval));
        }
        true
    }

    fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
    }

    fn is_complete(&self) -> bool {
        self.shown >= self.total
    }
}

/// Reveals a fixed list of log lines, one per tick
#[derive(Debug)]
pub struct LineRevealer {
    lines: Vec<String>,
    reveal: Reveal,
}

impl LineRevealer {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(800);

    pub fn new(lines: Vec<String>, interval: Duration) -> Self {
        let reveal = Reveal::new(lines.len(), interval);
        Self { lines, reveal }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines revealed so far (always a prefix of [`lines`](Self::lines))
    pub fn displayed(&self) -> &[String] {
        &self.lines[..self.reveal.shown]
    }

    pub fn is_visible(&self) -> bool {
        self.reveal.visible
    }

    pub fn is_complete(&self) -> bool {
        self.reveal.is_complete()
    }

    /// Whether a tick is pending
    pub fn is_running(&self) -> bool {
        self.reveal.timer.is_some()
    }

    /// Show or hide. Hiding clears the output; showing starts over from empty.
    pub fn set_visible(&mut self, visible: bool, scheduler: &mut dyn Scheduler) {
        self.reveal.set_visible(visible, scheduler);
    }

    /// Swap the log and start over
    pub fn set_lines(&mut self, lines: Vec<String>, scheduler: &mut dyn Scheduler) {
        self.lines = lines;
        self.reveal.reset_total(self.lines.len(), scheduler);
    }

    /// Offer a fired timer. Returns false if the id is not ours.
    pub fn on_timer(&mut self, timer: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        let handled = self.reveal.on_timer(timer, scheduler);
        if handled && self.is_complete() {
            tracing::trace!(lines = self.lines.len(), "log fully revealed");
        }
        handled
    }

    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.reveal.cancel(scheduler);
    }
}

/// Types out a single string, one character per tick.
///
/// A "character" is an extended grapheme cluster, so a check mark with a
/// variation selector appears in one step.
#[derive(Debug)]
pub struct CharRevealer {
    text: String,
    /// Byte offset at the end of each grapheme
    ends: Vec<usize>,
    reveal: Reveal,
}

impl CharRevealer {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(30);

    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        let text = text.into();
        let ends = grapheme_ends(&text);
        let reveal = Reveal::new(ends.len(), interval);
        Self { text, ends, reveal }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text typed so far (always a prefix of [`text`](Self::text))
    pub fn displayed(&self) -> &str {
        match self.reveal.shown {
            0 => "",
            shown => &self.text[..self.ends[shown - 1]],
        }
    }

    /// True while visible and not yet fully typed
    pub fn is_typing(&self) -> bool {
        self.reveal.visible && !self.reveal.is_complete()
    }

    pub fn is_visible(&self) -> bool {
        self.reveal.visible
    }

    pub fn is_complete(&self) -> bool {
        self.reveal.is_complete()
    }

    /// Show or hide. Hiding clears the output; showing starts over from empty.
    pub fn set_visible(&mut self, visible: bool, scheduler: &mut dyn Scheduler) {
        self.reveal.set_visible(visible, scheduler);
    }

    /// Swap the text and start over
    pub fn set_text(&mut self, text: impl Into<String>, scheduler: &mut dyn Scheduler) {
        self.text = text.into();
        self.ends = grapheme_ends(&self.text);
        self.reveal.reset_total(self.ends.len(), scheduler);
    }

    /// Offer a fired timer. Returns false if the id is not ours.
    pub fn on_timer(&mut self, timer: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        self.reveal.on_timer(timer, scheduler)
    }

    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.reveal.cancel(scheduler);
    }
}

fn grapheme_ends(text: &str) -> Vec<usize> {
    text.grapheme_indices(true)
        .map(|(start, grapheme)| start + grapheme.len())
        .collect()
}
