//! Stage tracking: which stage is active, which are completed
//!
//! [`TrackerState`] is a plain value with pure transitions. [`StageTracker`]
//! wraps it with the dwell timer and the viewport hook, and is what the UI
//! talks to.

use crate::scheduler::{Scheduler, TimerId};
use crate::stage::{StageId, StageStatus};
use std::collections::BTreeSet;
use std::time::Duration;

/// Scrolls stage sections into view on request.
///
/// Implemented by whatever owns the scroll position. The tracker only asks;
/// it never sees geometry. Visibility changes come back through
/// [`StageTracker::on_visibility_changed`].
pub trait ViewportController {
    /// Smoothly bring the section of `id` to the vertical center of the view
    fn scroll_into_view(&mut self, id: StageId);
}

/// Active stage plus the set of completed stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    active: StageId,
    completed: BTreeSet<StageId>,
    len: usize,
}

impl TrackerState {
    /// Fresh state for a pipeline of `len` stages, focused on the first one.
    ///
    /// # Panics
    /// If `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "a pipeline needs at least one stage");
        Self {
            active: StageId::new(0),
            completed: BTreeSet::new(),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn active(&self) -> StageId {
        self.active
    }

    pub fn completed(&self) -> &BTreeSet<StageId> {
        &self.completed
    }

    pub fn is_completed(&self, id: StageId) -> bool {
        self.completed.contains(&id)
    }

    pub fn all_completed(&self) -> bool {
        self.completed.len() == self.len
    }

    fn check(&self, id: StageId) {
        assert!(
            id.index() < self.len,
            "stage {} out of range for a pipeline of {} stages",
            id,
            self.len
        );
    }

    /// Focus `id` without completing anything
    pub fn with_active(mut self, id: StageId) -> Self {
        self.check(id);
        self.active = id;
        self
    }

    /// A section crossed the visibility threshold
    pub fn apply_visibility(self, id: StageId, is_intersecting: bool) -> Self {
        self.check(id);
        if is_intersecting {
            self.with_active(id)
        } else {
            self
        }
    }

    /// Explicit jump: focus `id` and complete every stage up to and including it
    pub fn apply_navigate(mut self, id: StageId) -> Self {
        self.check(id);
        self.active = id;
        self.completed.extend((0..=id.index()).map(StageId::new));
        self
    }

    /// Dwell timer armed for `id` ran out; completes it only if still focused
    pub fn apply_dwell_timeout(mut self, id: StageId) -> Self {
        self.check(id);
        if self.active == id {
            self.completed.insert(id);
        }
        self
    }

    /// Completed wins over running; membership is strict
    pub fn status(&self, id: StageId) -> StageStatus {
        self.check(id);
        if self.completed.contains(&id) {
            StageStatus::Success
        } else if id == self.active {
            StageStatus::Running
        } else {
            StageStatus::Pending
        }
    }
}

/// Tracker state bound to a dwell timer
#[derive(Debug)]
pub struct StageTracker {
    state: TrackerState,
    dwell: Duration,
    dwell_timer: Option<(TimerId, StageId)>,
    loading: bool,
}

impl StageTracker {
    pub const DEFAULT_DWELL: Duration = Duration::from_millis(600);

    /// New tracker in its loading phase. No dwell timer runs until
    /// [`finish_loading`](Self::finish_loading).
    pub fn new(len: usize, dwell: Duration) -> Self {
        Self {
            state: TrackerState::new(len),
            dwell,
            dwell_timer: None,
            loading: true,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn active(&self) -> StageId {
        self.state.active()
    }

    pub fn completed(&self) -> &BTreeSet<StageId> {
        self.state.completed()
    }

    pub fn is_completed(&self, id: StageId) -> bool {
        self.state.is_completed(id)
    }

    pub fn status(&self, id: StageId) -> StageStatus {
        self.state.status(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// End the loading phase and start dwelling on the current stage
    pub fn finish_loading(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.loading {
            return;
        }
        self.loading = false;
        tracing::debug!(stage = self.active().index(), "pipeline ready");
        self.arm_dwell(scheduler);
    }

    /// Focus `id`.
    ///
    /// # Panics
    /// If `id` is not a stage of this pipeline.
    pub fn set_active_stage(&mut self, id: StageId, scheduler: &mut dyn Scheduler) {
        let next = self.state.clone().with_active(id);
        self.transition(next, scheduler);
    }

    /// Jump to `id`, completing everything up to it, and scroll it into view.
    ///
    /// # Panics
    /// If `id` is not a stage of this pipeline.
    pub fn navigate_to(
        &mut self,
        id: StageId,
        scheduler: &mut dyn Scheduler,
        viewport: &mut dyn ViewportController,
    ) {
        let next = self.state.clone().apply_navigate(id);
        tracing::debug!(stage = id.index(), "navigate");
        self.transition(next, scheduler);
        viewport.scroll_into_view(id);
    }

    /// Visibility signal from the viewport.
    ///
    /// # Panics
    /// If `id` is not a stage of this pipeline.
    pub fn on_visibility_changed(
        &mut self,
        id: StageId,
        is_intersecting: bool,
        scheduler: &mut dyn Scheduler,
    ) {
        tracing::trace!(stage = id.index(), is_intersecting, "visibility changed");
        let next = self.state.clone().apply_visibility(id, is_intersecting);
        self.transition(next, scheduler);
    }

    /// Offer a fired timer. Returns false if the id is not ours.
    pub fn on_timer(&mut self, timer: TimerId, scheduler: &mut dyn Scheduler) -> bool {
        match self.dwell_timer {
            Some((armed, stage)) if armed == timer => {
                self.dwell_timer = None;
                let next = self.state.clone().apply_dwell_timeout(stage);
                if next.is_completed(stage) && !self.state.is_completed(stage) {
                    tracing::debug!(stage = stage.index(), "stage completed");
                }
                self.transition(next, scheduler);
                true
            }
            _ => false,
        }
    }

    /// Cancel the pending dwell timer, if any
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some((timer, _)) = self.dwell_timer.take() {
            scheduler.cancel(timer);
        }
    }

    fn transition(&mut self, next: TrackerState, scheduler: &mut dyn Scheduler) {
        let changed = next.active() != self.state.active();
        self.state = next;
        if changed {
            tracing::debug!(stage = self.active().index(), "stage active");
            self.arm_dwell(scheduler);
        }
    }

    fn arm_dwell(&mut self, scheduler: &mut dyn Scheduler) {
        self.teardown(scheduler);
        let active = self.active();
        if self.loading || self.state.is_completed(active) {
            return;
        }
        self.dwell_timer = Some((scheduler.schedule(self.dwell), active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerQueue;
    use proptest::prelude::*;

    const DWELL: Duration = Duration::from_millis(600);

    #[derive(Default)]
    struct RecordingViewport {
        requests: Vec<StageId>,
    }

    impl ViewportController for RecordingViewport {
        fn scroll_into_view(&mut self, id: StageId) {
            self.requests.push(id);
        }
    }

    fn id(index: usize) -> StageId {
        StageId::new(index)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn ready_tracker(len: usize, timers: &mut TimerQueue) -> StageTracker {
        let mut tracker = StageTracker::new(len, DWELL);
        tracker.finish_loading(timers);
        tracker
    }

    /// Fire everything due at `now` into the tracker
    fn advance(tracker: &mut StageTracker, timers: &mut TimerQueue, now: Duration) {
        while let Some(timer) = timers.pop_expired(now) {
            assert!(tracker.on_timer(timer, timers), "unexpected timer");
        }
    }

    fn completed(tracker: &StageTracker) -> Vec<usize> {
        tracker.completed().iter().map(|id| id.index()).collect()
    }

    #[test]
    fn test_status_derivation() {
        let state = TrackerState::new(4).with_active(id(1));
        assert_eq!(state.status(id(0)), StageStatus::Pending);
        assert_eq!(state.status(id(1)), StageStatus::Running);
        assert_eq!(state.status(id(2)), StageStatus::Pending);

        let state = state.apply_dwell_timeout(id(1));
        assert_eq!(state.status(id(1)), StageStatus::Success);
    }

    #[test]
    fn test_status_success_ahead_of_active() {
        let state = TrackerState::new(6).apply_navigate(id(4)).with_active(id(1));
        assert_eq!(state.active(), id(1));
        assert_eq!(state.status(id(4)), StageStatus::Success);
        assert_eq!(state.status(id(5)), StageStatus::Pending);
    }

    #[test]
    fn test_status_is_strict_membership() {
        // Stage 0 was never dwelled on or passed through
        let state = TrackerState::new(3)
            .with_active(id(2))
            .apply_dwell_timeout(id(2));
        assert_eq!(state.status(id(0)), StageStatus::Pending);
        assert_eq!(state.status(id(2)), StageStatus::Success);
    }

    #[test]
    fn test_apply_visibility_ignores_leaving_sections() {
        let state = TrackerState::new(3).apply_visibility(id(2), true);
        assert_eq!(state.active(), id(2));
        let state = state.apply_visibility(id(1), false);
        assert_eq!(state.active(), id(2));
        assert!(state.completed().is_empty());
    }

    #[test]
    fn test_dwell_timeout_for_stale_stage_is_ignored() {
        let state = TrackerState::new(3)
            .with_active(id(1))
            .apply_dwell_timeout(id(0));
        assert!(state.completed().is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_stage_panics() {
        let _ = TrackerState::new(3).apply_navigate(id(3));
    }

    #[test]
    fn test_navigate_completes_prefix_and_scrolls() {
        let mut timers = TimerQueue::new();
        let mut viewport = RecordingViewport::default();
        let mut tracker = ready_tracker(6, &mut timers);

        tracker.navigate_to(id(3), &mut timers, &mut viewport);

        assert_eq!(tracker.active(), id(3));
        assert_eq!(completed(&tracker), vec![0, 1, 2, 3]);
        assert_eq!(viewport.requests, vec![id(3)]);
        assert_eq!(tracker.status(id(3)), StageStatus::Success);
    }

    #[test]
    fn test_dwell_completes_active_stage() {
        let mut timers = TimerQueue::new();
        let mut tracker = ready_tracker(3, &mut timers);

        advance(&mut tracker, &mut timers, ms(599));
        assert!(completed(&tracker).is_empty());
        advance(&mut tracker, &mut timers, ms(600));
        assert_eq!(completed(&tracker), vec![0]);

        tracker.on_visibility_changed(id(1), true, &mut timers);
        advance(&mut tracker, &mut timers, ms(1300));
        assert_eq!(completed(&tracker), vec![0, 1]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_no_dwell_while_loading() {
        let mut timers = TimerQueue::new();
        let mut tracker = StageTracker::new(3, DWELL);

        tracker.on_visibility_changed(id(1), true, &mut timers);
        assert!(timers.is_empty());
        advance(&mut tracker, &mut timers, ms(5000));
        assert!(completed(&tracker).is_empty());

        tracker.finish_loading(&mut timers);
        advance(&mut tracker, &mut timers, ms(5600));
        assert_eq!(completed(&tracker), vec![1]);
    }

    #[test]
    fn test_superseded_dwell_never_fires() {
        let mut timers = TimerQueue::new();
        let mut tracker = ready_tracker(4, &mut timers);

        advance(&mut tracker, &mut timers, ms(200));
        tracker.on_visibility_changed(id(1), true, &mut timers);
        advance(&mut tracker, &mut timers, ms(400));
        tracker.on_visibility_changed(id(0), true, &mut timers);

        // Stage 0's first timer would have fired at 600, stage 1's at 800
        advance(&mut tracker, &mut timers, ms(999));
        assert!(completed(&tracker).is_empty());

        // Only the final, uninterrupted dwell on stage 0 counts
        advance(&mut tracker, &mut timers, ms(1000));
        assert_eq!(completed(&tracker), vec![0]);
        assert!(timers.is_empty());

        advance(&mut tracker, &mut timers, ms(10_000));
        assert_eq!(completed(&tracker), vec![0]);
    }

    #[test]
    fn test_set_active_stage_rearms_dwell() {
        let mut timers = TimerQueue::new();
        let mut tracker = ready_tracker(3, &mut timers);

        advance(&mut tracker, &mut timers, ms(300));
        tracker.set_active_stage(id(2), &mut timers);
        assert_eq!(tracker.active(), id(2));
        assert_eq!(timers.len(), 1);

        advance(&mut tracker, &mut timers, ms(899));
        assert!(completed(&tracker).is_empty());
        advance(&mut tracker, &mut timers, ms(900));
        assert_eq!(completed(&tracker), vec![2]);
    }

    #[test]
    fn test_no_dwell_for_completed_stage() {
        let mut timers = TimerQueue::new();
        let mut viewport = RecordingViewport::default();
        let mut tracker = ready_tracker(4, &mut timers);

        tracker.navigate_to(id(2), &mut timers, &mut viewport);
        assert!(timers.is_empty());

        tracker.on_visibility_changed(id(3), true, &mut timers);
        assert_eq!(timers.len(), 1);
        tracker.on_visibility_changed(id(1), true, &mut timers);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_teardown_cancels_dwell() {
        let mut timers = TimerQueue::new();
        let mut tracker = ready_tracker(2, &mut timers);
        tracker.teardown(&mut timers);
        assert!(timers.is_empty());
        advance(&mut tracker, &mut timers, ms(5000));
        assert!(completed(&tracker).is_empty());
    }

    #[test]
    fn test_foreign_timer_is_not_claimed() {
        let mut timers = TimerQueue::new();
        let mut tracker = ready_tracker(2, &mut timers);
        let foreign = timers.schedule(ms(10));
        assert!(!tracker.on_timer(foreign, &mut timers));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Visible(usize, bool),
        Navigate(usize),
        Advance(u64),
    }

    fn op(len: usize) -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..len, any::<bool>()).prop_map(|(i, v)| Op::Visible(i, v)),
            (0..len).prop_map(Op::Navigate),
            (0u64..1500).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #[test]
        fn prop_completed_is_monotone(ops in prop::collection::vec(op(6), 0..60)) {
            let mut timers = TimerQueue::new();
            let mut viewport = RecordingViewport::default();
            let mut tracker = ready_tracker(6, &mut timers);
            let mut now = Duration::ZERO;

            for op in ops {
                let before = tracker.completed().clone();
                match op {
                    Op::Visible(i, v) => tracker.on_visibility_changed(id(i), v, &mut timers),
                    Op::Navigate(k) => {
                        tracker.navigate_to(id(k), &mut timers, &mut viewport);
                        prop_assert_eq!(tracker.active(), id(k));
                        for j in 0..=k {
                            prop_assert!(tracker.is_completed(id(j)));
                        }
                    }
                    Op::Advance(delta) => {
                        now += Duration::from_millis(delta);
                        advance(&mut tracker, &mut timers, now);
                    }
                }
                prop_assert!(tracker.completed().is_superset(&before));
                prop_assert!(tracker.active().index() < tracker.len());
                for done in tracker.completed() {
                    prop_assert_eq!(tracker.status(*done), StageStatus::Success);
                }
            }
        }
    }
}
