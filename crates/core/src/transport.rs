//! Transport state machine for live call sequencing.
//!
//! Per-call states and legal transitions:
//!
//! ```text
//! pending --(cue)--> prep_started --(call)--> called --(call on a later call)--> completed
//! pending --(call, index at or ahead of the pointer)--> called
//! prep_started --(superseded by a different cue)--> pending
//! called --(skip)--> skipped
//! completed / skipped are terminal
//! ```
//!
//! [`plan_transport`] is a pure decision function over immutable
//! snapshots: it validates a host action against the session's
//! authoritative pointer and emits a [`TransportPlan`] describing every
//! side effect (call status changes, pointer advance, event-log rows).
//! The persistence layer applies the whole plan in a single transaction
//! under a session row lock, so a plan either lands completely or not at
//! all, and concurrent host actions serialize per session.

use serde_json::json;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Statuses and actions
// ---------------------------------------------------------------------------

/// Lifecycle status of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Pending,
    PrepStarted,
    Called,
    Completed,
    Skipped,
}

impl CallStatus {
    /// Terminal statuses admit no further transport transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Skipped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::PrepStarted => "prep_started",
            CallStatus::Called => "called",
            CallStatus::Completed => "completed",
            CallStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CallStatus::Pending),
            "prep_started" => Some(CallStatus::PrepStarted),
            "called" => Some(CallStatus::Called),
            "completed" => Some(CallStatus::Completed),
            "skipped" => Some(CallStatus::Skipped),
            _ => None,
        }
    }
}

/// A host action against one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    /// Stage two ahead for physical record retrieval (advisory).
    Pull,
    /// Stage one ahead on the spare turntable.
    Cue,
    /// Drop the needle: advance the session to this call.
    Call,
    /// Abandon the currently called track.
    Skip,
}

impl TransportAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportAction::Pull => "pull",
            TransportAction::Cue => "cue",
            TransportAction::Call => "call",
            TransportAction::Skip => "skip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pull" => Some(TransportAction::Pull),
            "cue" => Some(TransportAction::Cue),
            "call" => Some(TransportAction::Call),
            "skip" => Some(TransportAction::Skip),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots and plans
// ---------------------------------------------------------------------------

/// The slice of the session row a transport decision depends on.
///
/// Always read from the just-locked row, never from client state.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot {
    pub current_call_index: i32,
}

/// The slice of a call row a transport decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct CallSnapshot {
    pub id: DbId,
    pub call_index: i32,
    pub status: CallStatus,
}

/// A single call status mutation within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallChange {
    pub call_id: DbId,
    pub status: CallStatus,
}

/// One event-log row a plan appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    PullSet { call_id: DbId, call_index: i32 },
    CueSet { call_id: DbId, call_index: i32 },
    CallSet { call_id: DbId, call_index: i32 },
    CallSkipped { call_id: DbId, call_index: i32 },
}

impl TransportEvent {
    pub fn event_type(self) -> &'static str {
        match self {
            TransportEvent::PullSet { .. } => "pull_set",
            TransportEvent::CueSet { .. } => "cue_set",
            TransportEvent::CallSet { .. } => "call_set",
            TransportEvent::CallSkipped { .. } => "call_skipped",
        }
    }

    pub fn call_id(self) -> DbId {
        let (TransportEvent::PullSet { call_id, .. }
        | TransportEvent::CueSet { call_id, .. }
        | TransportEvent::CallSet { call_id, .. }
        | TransportEvent::CallSkipped { call_id, .. }) = self;
        call_id
    }

    pub fn payload(self) -> serde_json::Value {
        let (TransportEvent::PullSet { call_id, call_index }
        | TransportEvent::CueSet { call_id, call_index }
        | TransportEvent::CallSet { call_id, call_index }
        | TransportEvent::CallSkipped { call_id, call_index }) = self;
        json!({ "call_id": call_id, "call_index": call_index })
    }
}

/// Every side effect of one accepted transport action.
///
/// Applied atomically by the persistence layer: all call changes, the
/// pointer advance, and the event rows land together or not at all.
#[derive(Debug, Clone, Default)]
pub struct TransportPlan {
    pub changes: Vec<CallChange>,
    /// `Some(new_index)` only for an accepted `call` action.
    pub advance_to: Option<i32>,
    pub events: Vec<TransportEvent>,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Validate a host action and derive its full side-effect plan.
///
/// `calls` is the session's complete call list. Rejections carry the
/// current-vs-requested index context so the host UI can explain the
/// conflict; nothing is ever partially planned.
pub fn plan_transport(
    action: TransportAction,
    session: &SessionSnapshot,
    calls: &[CallSnapshot],
    target_id: DbId,
) -> Result<TransportPlan, CoreError> {
    let target = calls
        .iter()
        .find(|c| c.id == target_id)
        .copied()
        .ok_or(CoreError::NotFound {
            entity: "SessionCall",
            id: target_id,
        })?;

    if target.status.is_terminal() {
        return Err(CoreError::ConflictingState(format!(
            "call {} at index {} is already {}",
            target.id,
            target.call_index,
            target.status.as_str()
        )));
    }

    match action {
        TransportAction::Pull => plan_pull(session, target),
        TransportAction::Cue => plan_cue(session, calls, target),
        TransportAction::Call => plan_call(session, calls, target),
        TransportAction::Skip => plan_skip(target),
    }
}

fn plan_pull(session: &SessionSnapshot, target: CallSnapshot) -> Result<TransportPlan, CoreError> {
    if target.call_index <= session.current_call_index {
        return Err(CoreError::OrderingViolation {
            current: session.current_call_index,
            requested: target.call_index,
        });
    }
    if target.status != CallStatus::Pending {
        return Err(CoreError::ConflictingState(format!(
            "pull can only target a pending future call, call {} is {}",
            target.id,
            target.status.as_str()
        )));
    }

    // Advisory: recorded in the event log, no status mutation.
    Ok(TransportPlan {
        changes: Vec::new(),
        advance_to: None,
        events: vec![TransportEvent::PullSet {
            call_id: target.id,
            call_index: target.call_index,
        }],
    })
}

fn plan_cue(
    session: &SessionSnapshot,
    calls: &[CallSnapshot],
    target: CallSnapshot,
) -> Result<TransportPlan, CoreError> {
    if target.call_index <= session.current_call_index {
        return Err(CoreError::OrderingViolation {
            current: session.current_call_index,
            requested: target.call_index,
        });
    }

    let mut plan = TransportPlan::default();

    // At most one call may be cued: demote any other prep_started call.
    let demoted = demote_other_prep(calls, target.id, &mut plan);

    plan.changes.push(CallChange {
        call_id: target.id,
        status: CallStatus::PrepStarted,
    });
    plan.events.push(TransportEvent::CueSet {
        call_id: target.id,
        call_index: target.call_index,
    });

    // Lookahead is always exactly one step beyond the cue pointer.
    if let Some(pull) = next_pending_after(calls, target.call_index, &demoted) {
        plan.events.push(TransportEvent::PullSet {
            call_id: pull.id,
            call_index: pull.call_index,
        });
    }

    Ok(plan)
}

fn plan_call(
    session: &SessionSnapshot,
    calls: &[CallSnapshot],
    target: CallSnapshot,
) -> Result<TransportPlan, CoreError> {
    // The pointer never rewinds; re-calling the current call is legal
    // (idempotent retry after a lost response).
    if target.call_index < session.current_call_index {
        return Err(CoreError::OrderingViolation {
            current: session.current_call_index,
            requested: target.call_index,
        });
    }

    let mut plan = TransportPlan::default();

    // Finalize whatever was on the platter.
    for call in calls {
        if call.status == CallStatus::Called && call.id != target.id {
            plan.changes.push(CallChange {
                call_id: call.id,
                status: CallStatus::Completed,
            });
        }
    }

    let demoted = demote_other_prep(calls, target.id, &mut plan);

    plan.changes.push(CallChange {
        call_id: target.id,
        status: CallStatus::Called,
    });
    plan.advance_to = Some(target.call_index);
    plan.events.push(TransportEvent::CallSet {
        call_id: target.id,
        call_index: target.call_index,
    });

    // Re-prime the one-ahead / two-ahead pipeline.
    if let Some(cue) = next_pending_after(calls, target.call_index, &demoted) {
        plan.changes.push(CallChange {
            call_id: cue.id,
            status: CallStatus::PrepStarted,
        });
        plan.events.push(TransportEvent::CueSet {
            call_id: cue.id,
            call_index: cue.call_index,
        });

        if let Some(pull) = next_pending_after(calls, cue.call_index, &demoted) {
            plan.events.push(TransportEvent::PullSet {
                call_id: pull.id,
                call_index: pull.call_index,
            });
        }
    }

    Ok(plan)
}

fn plan_skip(target: CallSnapshot) -> Result<TransportPlan, CoreError> {
    if target.status != CallStatus::Called {
        return Err(CoreError::ConflictingState(format!(
            "skip can only target the called track, call {} is {}",
            target.id,
            target.status.as_str()
        )));
    }

    Ok(TransportPlan {
        changes: vec![CallChange {
            call_id: target.id,
            status: CallStatus::Skipped,
        }],
        advance_to: None,
        events: vec![TransportEvent::CallSkipped {
            call_id: target.id,
            call_index: target.call_index,
        }],
    })
}

/// Demote every `prep_started` call other than `keep_id`, recording the
/// demotions in `plan`. Returns the demoted ids so lookahead derivation
/// can treat them as pending again.
fn demote_other_prep(calls: &[CallSnapshot], keep_id: DbId, plan: &mut TransportPlan) -> Vec<DbId> {
    let mut demoted = Vec::new();
    for call in calls {
        if call.status == CallStatus::PrepStarted && call.id != keep_id {
            plan.changes.push(CallChange {
                call_id: call.id,
                status: CallStatus::Pending,
            });
            demoted.push(call.id);
        }
    }
    demoted
}

/// First call past `after_index` that is pending once this plan lands
/// (a call being demoted in the same plan counts as pending).
fn next_pending_after<'a>(
    calls: &'a [CallSnapshot],
    after_index: i32,
    demoted: &[DbId],
) -> Option<&'a CallSnapshot> {
    calls
        .iter()
        .filter(|c| c.call_index > after_index)
        .filter(|c| c.status == CallStatus::Pending || demoted.contains(&c.id))
        .min_by_key(|c| c.call_index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
