//! Pacing budgets and countdown arithmetic.
//!
//! The engine never runs timers. It records when a countdown started (and
//! a remaining-seconds snapshot while paused) so every polling client can
//! recompute elapsed/remaining time locally from the same fields.

use crate::types::Timestamp;

/// Advisory per-call pacing budgets, in display order of the host
/// checklist: sleeve off, vinyl on, needle cue, start slide, host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingBudgets {
    pub remove_resleeve_seconds: i32,
    pub place_vinyl_seconds: i32,
    pub cue_seconds: i32,
    pub start_slide_seconds: i32,
    pub host_buffer_seconds: i32,
    /// Network output latency (e.g. a multi-room speaker system).
    pub output_delay_ms: i32,
}

impl Default for PacingBudgets {
    fn default() -> Self {
        Self {
            remove_resleeve_seconds: 20,
            place_vinyl_seconds: 8,
            cue_seconds: 12,
            start_slide_seconds: 5,
            host_buffer_seconds: 2,
            output_delay_ms: 75,
        }
    }
}

impl PacingBudgets {
    /// Total call-to-call budget: the five stage budgets plus the output
    /// delay rounded up to whole seconds.
    pub fn seconds_to_next_call(&self) -> i32 {
        self.remove_resleeve_seconds
            + self.place_vinyl_seconds
            + self.cue_seconds
            + self.start_slide_seconds
            + self.host_buffer_seconds
            + (self.output_delay_ms as u32).div_ceil(1000) as i32
    }
}

/// Seconds left on the between-calls countdown.
///
/// Paused sessions report the frozen snapshot; sessions whose countdown
/// never started report the full budget; otherwise budget minus elapsed,
/// floored at zero.
pub fn remaining_seconds(
    budget_seconds: i32,
    countdown_started_at: Option<Timestamp>,
    paused_at: Option<Timestamp>,
    paused_remaining_seconds: Option<i32>,
    now: Timestamp,
) -> i32 {
    if paused_at.is_some() {
        return paused_remaining_seconds.unwrap_or(budget_seconds).max(0);
    }
    let Some(started) = countdown_started_at else {
        return budget_seconds;
    };
    let elapsed = (now - started).num_seconds();
    (budget_seconds as i64 - elapsed).clamp(0, budget_seconds as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn default_budget_matches_the_house_checklist() {
        // 20 + 8 + 12 + 5 + 2 + ceil(75ms) = 48
        assert_eq!(PacingBudgets::default().seconds_to_next_call(), 48);
    }

    #[test]
    fn output_delay_rounds_up_to_whole_seconds() {
        let budgets = PacingBudgets {
            output_delay_ms: 1001,
            ..PacingBudgets::default()
        };
        assert_eq!(budgets.seconds_to_next_call(), 49);
    }

    #[test]
    fn remaining_counts_down_from_the_start_stamp() {
        let now = Utc::now();
        let started = now - Duration::seconds(10);
        assert_eq!(remaining_seconds(48, Some(started), None, None, now), 38);
    }

    #[test]
    fn remaining_floors_at_zero() {
        let now = Utc::now();
        let started = now - Duration::seconds(500);
        assert_eq!(remaining_seconds(48, Some(started), None, None, now), 0);
    }

    #[test]
    fn unstarted_countdown_reports_the_full_budget() {
        assert_eq!(remaining_seconds(48, None, None, None, Utc::now()), 48);
    }

    #[test]
    fn paused_sessions_report_the_frozen_snapshot() {
        let now = Utc::now();
        let started = now - Duration::seconds(40);
        assert_eq!(
            remaining_seconds(48, Some(started), Some(now), Some(31), now),
            31
        );
    }
}
