//! Session lifecycle: status machine and pause/resume/round arithmetic.
//!
//! Statuses progress `pending -> running -> paused -> completed`. Round
//! advance is triggered externally by scoring confirmation; the engine
//! only moves pointers and never decides winners (the round-end,
//! tie-break, and pool-exhaustion policies stay opaque configuration the
//! host layer interprets).

use chrono::Duration;

use crate::error::CoreError;
use crate::pacing::remaining_seconds;
use crate::types::Timestamp;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Running,
    Paused,
    Completed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SessionStatus::Pending),
            "running" => Some(SessionStatus::Running),
            "paused" => Some(SessionStatus::Paused),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// The slice of the session row lifecycle decisions depend on.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleSnapshot {
    pub status: SessionStatus,
    pub current_round: i32,
    pub round_count: i32,
    pub seconds_to_next_call: i32,
    pub countdown_started_at: Option<Timestamp>,
    pub paused_at: Option<Timestamp>,
    pub paused_remaining_seconds: Option<i32>,
}

/// Fields written by an accepted pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PausePlan {
    pub paused_at: Timestamp,
    pub paused_remaining_seconds: i32,
}

/// Freeze the countdown, snapshotting the remaining seconds so resume is
/// exact rather than a reset.
pub fn plan_pause(session: &LifecycleSnapshot, now: Timestamp) -> Result<PausePlan, CoreError> {
    if session.status != SessionStatus::Running {
        return Err(CoreError::ConflictingState(format!(
            "only a running session can pause, session is {}",
            session.status.as_str()
        )));
    }
    Ok(PausePlan {
        paused_at: now,
        paused_remaining_seconds: remaining_seconds(
            session.seconds_to_next_call,
            session.countdown_started_at,
            None,
            None,
            now,
        ),
    })
}

/// Fields written by an accepted resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePlan {
    /// Rewound start stamp: the countdown picks up exactly where the
    /// pause snapshot left it.
    pub countdown_started_at: Timestamp,
}

pub fn plan_resume(session: &LifecycleSnapshot, now: Timestamp) -> Result<ResumePlan, CoreError> {
    if session.status != SessionStatus::Paused {
        return Err(CoreError::ConflictingState(format!(
            "only a paused session can resume, session is {}",
            session.status.as_str()
        )));
    }
    let remaining = session
        .paused_remaining_seconds
        .unwrap_or(session.seconds_to_next_call)
        .clamp(0, session.seconds_to_next_call);
    let already_elapsed = session.seconds_to_next_call - remaining;
    Ok(ResumePlan {
        countdown_started_at: now - Duration::seconds(already_elapsed as i64),
    })
}

/// Explicit host completion. Terminal; repeated completion conflicts.
pub fn plan_complete(session: &LifecycleSnapshot) -> Result<(), CoreError> {
    if session.status == SessionStatus::Completed {
        return Err(CoreError::ConflictingState(
            "session is already completed".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of a round advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAdvance {
    /// The final round was confirmed: the session completes.
    Completed,
    /// Move to `round`, dropping the pointer to just before the round's
    /// first call (`None` leaves the pointer where it is).
    NextRound {
        round: i32,
        call_pointer: Option<i32>,
    },
}

/// Consume an external scoring confirmation and advance the round.
///
/// `next_round_first_call_index` is the lowest `call_index` belonging to
/// the next round, if any calls were partitioned into it. Historical
/// calls are never touched.
pub fn plan_advance_round(
    session: &LifecycleSnapshot,
    next_round_first_call_index: Option<i32>,
) -> Result<RoundAdvance, CoreError> {
    if session.status == SessionStatus::Completed {
        return Err(CoreError::ConflictingState(
            "session is already completed".to_string(),
        ));
    }
    if session.current_round >= session.round_count {
        return Ok(RoundAdvance::Completed);
    }
    Ok(RoundAdvance::NextRound {
        round: session.current_round + 1,
        call_pointer: next_round_first_call_index.map(|index| index - 1),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
