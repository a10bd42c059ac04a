//! Integration tests for transport execution against real rows.
//!
//! Creates a session, drives the call/cue/pull/skip actions through
//! [`TransportRepo`], and verifies statuses, the session pointer, and
//! the event log after each transition.

use assert_matches::assert_matches;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;

use needledrop_core::deck::songs_per_round;
use needledrop_core::error::CoreError;
use needledrop_core::modes::{CallMode, CardLayout, GameVariant, LabelMode};
use needledrop_core::pacing::PacingBudgets;
use needledrop_core::transport::TransportAction;
use needledrop_db::models::call::Call;
use needledrop_db::models::playlist::NewPlaylistTrack;
use needledrop_db::models::session::CreateSession;
use needledrop_db::repositories::{CallRepo, EventRepo, PlaylistRepo, SessionRepo, TransportRepo};
use needledrop_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seed a playlist and create a setlist-ordered session over it,
/// returning the session id and its calls in playback order.
async fn session_with_calls(pool: &PgPool) -> (i64, Vec<Call>) {
    let playlist = PlaylistRepo::create(pool, "Transport Night").await.unwrap();
    for i in 1..=25 {
        PlaylistRepo::add_track(
            pool,
            playlist.id,
            &NewPlaylistTrack {
                sort_order: i,
                title: format!("Track {i}"),
                artist: format!("Artist {i}"),
                album: None,
                side: None,
                position: None,
            },
        )
        .await
        .unwrap();
    }
    let deck: Vec<_> = PlaylistRepo::list_tracks(pool, playlist.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.into_pool_track())
        .collect();

    let budgets = PacingBudgets::default();
    let create = CreateSession {
        playlist_id: playlist.id,
        event_name: None,
        session_code: "TRNSPT".to_string(),
        variant: GameVariant::SingleLine,
        call_mode: CallMode::Setlist,
        card_count: 2,
        card_layout: CardLayout::TwoUp,
        label_mode: LabelMode::TrackArtist,
        round_count: 1,
        songs_per_round: songs_per_round(deck.len(), 1),
        remove_resleeve_seconds: budgets.remove_resleeve_seconds,
        place_vinyl_seconds: budgets.place_vinyl_seconds,
        cue_seconds: budgets.cue_seconds,
        start_slide_seconds: budgets.start_slide_seconds,
        host_buffer_seconds: budgets.host_buffer_seconds,
        output_delay_ms: budgets.output_delay_ms,
        seconds_to_next_call: budgets.seconds_to_next_call(),
        recent_calls_limit: 5,
        show_title: true,
        show_logo: true,
        show_rounds: true,
        show_countdown: true,
    };
    let mut rng = StdRng::seed_from_u64(7);
    let session = SessionRepo::create_with_deck(pool, &create, &deck, &mut rng)
        .await
        .unwrap();
    let calls = CallRepo::list(pool, session.id).await.unwrap();
    (session.id, calls)
}

fn call_at<'a>(calls: &'a [Call], index: i32) -> &'a Call {
    calls.iter().find(|c| c.call_index == index).unwrap()
}

async fn status_of(pool: &PgPool, session_id: i64, index: i32) -> String {
    let calls = CallRepo::list(pool, session_id).await.unwrap();
    call_at(&calls, index).status.clone()
}

// ---------------------------------------------------------------------------
// Test: first call starts the session and primes the pipeline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_call_starts_session_and_primes_lookahead(pool: PgPool) {
    let (session_id, calls) = session_with_calls(&pool).await;

    let outcome = TransportRepo::execute(
        &pool,
        session_id,
        TransportAction::Call,
        call_at(&calls, 1).id,
        Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.session.current_call_index, 1);
    assert_eq!(outcome.session.status, "running");
    assert!(outcome.session.started_at.is_some());
    assert!(outcome.session.countdown_started_at.is_some());

    assert_eq!(status_of(&pool, session_id, 1).await, "called");
    assert_eq!(status_of(&pool, session_id, 2).await, "prep_started");
    assert_eq!(status_of(&pool, session_id, 3).await, "pending");

    // call_set + auto cue_set + auto pull_set, in order.
    let events = EventRepo::list_recent(&pool, session_id, Some(10))
        .await
        .unwrap();
    let types: Vec<&str> = events.iter().rev().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["call_set", "cue_set", "pull_set"]);
    assert_eq!(events[0].payload["call_index"], 3);
}

// ---------------------------------------------------------------------------
// Test: jumping ahead finalizes, demotes, and re-primes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_call_ahead_finalizes_and_reprimes(pool: PgPool) {
    let (session_id, calls) = session_with_calls(&pool).await;
    let now = Utc::now();

    TransportRepo::execute(&pool, session_id, TransportAction::Call, call_at(&calls, 1).id, now)
        .await
        .unwrap();

    // Host jumps to 5: 1 finalizes, auto-cued 2 demotes, 6/7 re-prime.
    let outcome =
        TransportRepo::execute(&pool, session_id, TransportAction::Call, call_at(&calls, 5).id, now)
            .await
            .unwrap();

    assert_eq!(outcome.session.current_call_index, 5);
    assert_eq!(status_of(&pool, session_id, 1).await, "completed");
    assert_eq!(status_of(&pool, session_id, 2).await, "pending");
    assert_eq!(status_of(&pool, session_id, 5).await, "called");
    assert_eq!(status_of(&pool, session_id, 6).await, "prep_started");

    // Rewinding behind the pointer is rejected with index context.
    let err = TransportRepo::execute(
        &pool,
        session_id,
        TransportAction::Call,
        call_at(&calls, 3).id,
        now,
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::OrderingViolation {
            current: 5,
            requested: 3
        })
    );
}

// ---------------------------------------------------------------------------
// Test: cue demotion keeps at most one call staged
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_second_cue_demotes_the_first(pool: PgPool) {
    let (session_id, calls) = session_with_calls(&pool).await;
    let now = Utc::now();

    TransportRepo::execute(&pool, session_id, TransportAction::Cue, call_at(&calls, 3).id, now)
        .await
        .unwrap();
    TransportRepo::execute(&pool, session_id, TransportAction::Cue, call_at(&calls, 4).id, now)
        .await
        .unwrap();

    assert_eq!(status_of(&pool, session_id, 3).await, "pending");
    assert_eq!(status_of(&pool, session_id, 4).await, "prep_started");

    let cued: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM session_calls WHERE session_id = $1 AND status = 'prep_started'",
    )
    .bind(session_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(cued, 1);
}

// ---------------------------------------------------------------------------
// Test: pull is advisory
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_pull_logs_without_touching_status(pool: PgPool) {
    let (session_id, calls) = session_with_calls(&pool).await;

    TransportRepo::execute(
        &pool,
        session_id,
        TransportAction::Pull,
        call_at(&calls, 2).id,
        Utc::now(),
    )
    .await
    .unwrap();

    assert_eq!(status_of(&pool, session_id, 2).await, "pending");
    let events = EventRepo::list_recent(&pool, session_id, None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "pull_set");
}

// ---------------------------------------------------------------------------
// Test: skip is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_skip_terminates_the_called_track(pool: PgPool) {
    let (session_id, calls) = session_with_calls(&pool).await;
    let now = Utc::now();

    TransportRepo::execute(&pool, session_id, TransportAction::Call, call_at(&calls, 1).id, now)
        .await
        .unwrap();
    TransportRepo::execute(&pool, session_id, TransportAction::Skip, call_at(&calls, 1).id, now)
        .await
        .unwrap();

    assert_eq!(status_of(&pool, session_id, 1).await, "skipped");

    // Terminal: every further action on the call conflicts.
    for action in [TransportAction::Cue, TransportAction::Call, TransportAction::Skip] {
        let err =
            TransportRepo::execute(&pool, session_id, action, call_at(&calls, 1).id, now)
                .await
                .unwrap_err();
        assert_matches!(err, DbError::Core(CoreError::ConflictingState(_)));
    }
}

// ---------------------------------------------------------------------------
// Test: unknown targets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_session_and_call_are_not_found(pool: PgPool) {
    let (session_id, _) = session_with_calls(&pool).await;

    let err = TransportRepo::execute(&pool, 999_999, TransportAction::Call, 1, Utc::now())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "GameSession",
            ..
        })
    );

    let err =
        TransportRepo::execute(&pool, session_id, TransportAction::Call, 999_999, Utc::now())
            .await
            .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "SessionCall",
            ..
        })
    );
}
