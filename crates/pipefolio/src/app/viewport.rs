//! Scroll position, smooth scrolling and section visibility

use super::types::{ScrollAnimation, SectionSpan};
use crate::color::ease_out;
use pipefolio_core::{StageId, ViewportController};
use std::time::Duration;

/// The scrolled page as seen through the terminal
#[derive(Debug)]
pub struct ScrollViewport {
    sections: Vec<SectionSpan>,
    content_height: usize,
    height: usize,
    offset: usize,
    inset: usize,
    threshold: f32,
    intersecting: Vec<bool>,
    animation: Option<ScrollAnimation>,
    /// Scroll request made before the first layout
    pending: Option<StageId>,
    scroll_duration: Duration,
    now: Duration,
}

impl ScrollViewport {
    pub fn new(inset: usize, threshold: f32, scroll_duration: Duration) -> Self {
        Self {
            sections: Vec::new(),
            content_height: 0,
            height: 0,
            offset: 0,
            inset,
            threshold: threshold.clamp(0.0, 1.0),
            intersecting: Vec::new(),
            animation: None,
            pending: None,
            scroll_duration,
            now: Duration::ZERO,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.height)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Replace the page geometry after a render.
    /// Returns true if anything changed.
    pub fn set_layout(&mut self, sections: Vec<SectionSpan>, height: usize) -> bool {
        let content_height = sections.last().map(SectionSpan::end).unwrap_or(0);
        let changed = sections != self.sections || height != self.height;
        if sections.len() != self.intersecting.len() {
            self.intersecting = vec![false; sections.len()];
        }
        self.sections = sections;
        self.content_height = content_height;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());

        if let Some(id) = self.pending.take() {
            self.start_scroll(id);
        } else if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.min(content_height.saturating_sub(height));
        }
        changed
    }

    /// Advance the clock and any running animation.
    /// Returns true if the offset moved.
    pub fn step(&mut self, now: Duration) -> bool {
        self.now = self.now.max(now);
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = self.now.saturating_sub(anim.started);
        let t = if anim.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / anim.duration.as_secs_f32()
        };
        let eased = ease_out(t);
        let next = if anim.to >= anim.from {
            anim.from + ((anim.to - anim.from) as f32 * eased).round() as usize
        } else {
            anim.from - ((anim.from - anim.to) as f32 * eased).round() as usize
        };
        if t >= 1.0 {
            self.animation = None;
        }
        let next = next.min(self.max_offset());
        let moved = next != self.offset;
        self.offset = next;
        moved
    }

    /// Manual scroll. Cancels any smooth scroll in progress.
    pub fn scroll_by(&mut self, delta: isize) {
        self.animation = None;
        self.pending = None;
        self.offset = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
    }

    /// Offset that centers `id` (or aligns its top when it is taller than the view)
    pub fn target_offset(&self, id: StageId) -> Option<usize> {
        let section = self.sections.get(id.index())?;
        let slack = self.height.saturating_sub(section.height) / 2;
        Some(section.start.saturating_sub(slack).min(self.max_offset()))
    }

    fn start_scroll(&mut self, id: StageId) {
        let Some(target) = self.target_offset(id) else {
            tracing::warn!(stage = id.index(), "scroll target outside layout");
            return;
        };
        tracing::trace!(stage = id.index(), from = self.offset, to = target, "smooth scroll");
        self.animation = Some(ScrollAnimation {
            from: self.offset,
            to: target,
            started: self.now,
            duration: self.scroll_duration,
        });
        if self.scroll_duration.is_zero() {
            self.step(self.now);
        }
    }

    /// Rows of the view that count for visibility: the viewport trimmed by
    /// the inset on both ends, or the whole viewport if that leaves nothing.
    fn band(&self) -> (usize, usize) {
        let top = self.offset;
        let bottom = self.offset + self.height;
        if self.inset * 2 < self.height {
            (top + self.inset, bottom - self.inset)
        } else {
            (top, bottom)
        }
    }

    fn in_view(&self, section: SectionSpan) -> bool {
        if section.height == 0 {
            return false;
        }
        let (band_top, band_bottom) = self.band();
        let overlap = section
            .end()
            .min(band_bottom)
            .saturating_sub(section.start.max(band_top));
        if overlap == 0 {
            return false;
        }
        let covers_band = overlap == band_bottom - band_top;
        let fraction = overlap as f32 / section.height as f32;
        covers_band || fraction >= self.threshold
    }

    /// Sections whose in-view state flipped since the last call, in page order
    pub fn observe(&mut self) -> Vec<(StageId, bool)> {
        if self.height == 0 {
            return Vec::new();
        }
        let mut changes = Vec::new();
        for (index, section) in self.sections.iter().enumerate() {
            let now_in = self.in_view(*section);
            if self.intersecting[index] != now_in {
                self.intersecting[index] = now_in;
                changes.push((StageId::new(index), now_in));
            }
        }
        changes
    }

    pub fn is_intersecting(&self, id: StageId) -> bool {
        self.intersecting.get(id.index()).copied().unwrap_or(false)
    }

    /// How far down the page the view is, 0 to 100
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max == 0 {
            return 100.0;
        }
        (self.offset as f32 / max as f32 * 100.0).min(100.0)
    }
}

impl ViewportController for ScrollViewport {
    fn scroll_into_view(&mut self, id: StageId) {
        if self.sections.is_empty() {
            self.pending = Some(id);
            return;
        }
        self.start_scroll(id);
    }
}
