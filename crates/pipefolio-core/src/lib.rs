//! Core state machines for pipefolio
//!
//! The portfolio is a fixed list of pipeline stages. This crate decides which
//! stage is active and which are completed ([`StageTracker`]), and reveals the
//! per-stage console output over time ([`LineRevealer`], [`CharRevealer`]).
//! All timing goes through the [`Scheduler`] trait so the state machines can be
//! driven by a real clock or by hand.

pub mod content;
pub mod revealer;
pub mod scheduler;
pub mod stage;
pub mod tracker;

pub use content::{Block, ContentError, Portfolio, StageContent};
pub use revealer::{CharRevealer, LineRevealer};
pub use scheduler::{Scheduler, TimerId, TimerQueue};
pub use stage::{StageId, StageStatus};
pub use tracker::{StageTracker, TrackerState, ViewportController};
