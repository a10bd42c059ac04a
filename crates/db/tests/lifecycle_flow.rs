//! Integration tests for session lifecycle operations.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;

use needledrop_core::deck::songs_per_round;
use needledrop_core::error::CoreError;
use needledrop_core::modes::{CallMode, CardLayout, GameVariant, LabelMode};
use needledrop_core::pacing::{remaining_seconds, PacingBudgets};
use needledrop_core::transport::TransportAction;
use needledrop_db::models::playlist::NewPlaylistTrack;
use needledrop_db::models::session::{CreateSession, UpdateSessionConfig};
use needledrop_db::repositories::{CallRepo, PlaylistRepo, SessionRepo, TransportRepo};
use needledrop_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn running_session(pool: &PgPool) -> i64 {
    let playlist = PlaylistRepo::create(pool, "Lifecycle Night").await.unwrap();
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
        session_code: "LYFCYC".to_string(),
        variant: GameVariant::SingleLine,
        call_mode: CallMode::Setlist,
        card_count: 2,
        card_layout: CardLayout::TwoUp,
        label_mode: LabelMode::TrackArtist,
        round_count: 3,
        songs_per_round: songs_per_round(deck.len(), 3),
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
    let mut rng = StdRng::seed_from_u64(3);
    let session = SessionRepo::create_with_deck(pool, &create, &deck, &mut rng)
        .await
        .unwrap();

    // First call moves the session to running and starts the countdown.
    let calls = CallRepo::list(pool, session.id).await.unwrap();
    TransportRepo::execute(
        pool,
        session.id,
        TransportAction::Call,
        calls[0].id,
        Utc::now() - Duration::seconds(10),
    )
    .await
    .unwrap();
    session.id
}

// ---------------------------------------------------------------------------
// Test: pause freezes, resume restores exactly
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_pause_and_resume_preserve_remaining_time(pool: PgPool) {
    let session_id = running_session(&pool).await;
    let now = Utc::now();

    let paused = SessionRepo::pause(&pool, session_id, now).await.unwrap();
    assert_eq!(paused.status, "paused");
    // Countdown started 10 seconds ago with a 48 second budget.
    assert_eq!(paused.paused_remaining_seconds, Some(38));

    // Resume much later: the countdown picks up at 38, not at 48.
    let later = now + Duration::seconds(600);
    let resumed = SessionRepo::resume(&pool, session_id, later).await.unwrap();
    assert_eq!(resumed.status, "running");
    assert_eq!(resumed.paused_at, None);
    assert_eq!(resumed.paused_remaining_seconds, None);
    let remaining = remaining_seconds(
        resumed.seconds_to_next_call,
        resumed.countdown_started_at,
        None,
        None,
        later,
    );
    assert_eq!(remaining, 38);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_pause_requires_running_and_resume_requires_paused(pool: PgPool) {
    let session_id = running_session(&pool).await;
    let now = Utc::now();

    let err = SessionRepo::resume(&pool, session_id, now).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::ConflictingState(_)));

    SessionRepo::pause(&pool, session_id, now).await.unwrap();
    let err = SessionRepo::pause(&pool, session_id, now).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::ConflictingState(_)));
}

// ---------------------------------------------------------------------------
// Test: round advance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_round_advance_moves_pointer_to_the_new_round(pool: PgPool) {
    let session_id = running_session(&pool).await;
    let now = Utc::now();

    let advanced = SessionRepo::advance_round(&pool, session_id, now)
        .await
        .unwrap();
    assert_eq!(advanced.current_round, 2);
    // 25 calls over 3 rounds puts round 2's first call at index 10.
    assert_eq!(advanced.current_call_index, 9);
    assert!(!advanced.winner_pending);
    assert_eq!(advanced.countdown_started_at, None);

    // Historical calls are untouched by the advance.
    let calls = CallRepo::list(&pool, session_id).await.unwrap();
    assert_eq!(calls[0].status, "called");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_advancing_past_the_final_round_completes(pool: PgPool) {
    let session_id = running_session(&pool).await;
    let now = Utc::now();

    SessionRepo::advance_round(&pool, session_id, now).await.unwrap();
    SessionRepo::advance_round(&pool, session_id, now).await.unwrap();
    let done = SessionRepo::advance_round(&pool, session_id, now)
        .await
        .unwrap();

    assert_eq!(done.status, "completed");
    assert!(done.ended_at.is_some());

    let err = SessionRepo::advance_round(&pool, session_id, now)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::ConflictingState(_)));
}

// ---------------------------------------------------------------------------
// Test: display config patch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_config_patch_updates_only_named_fields(pool: PgPool) {
    let session_id = running_session(&pool).await;

    let updated = SessionRepo::update_config(
        &pool,
        session_id,
        &UpdateSessionConfig {
            recent_calls_limit: Some(8),
            show_countdown: Some(false),
            winner_pending: Some(true),
            ..UpdateSessionConfig::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.recent_calls_limit, 8);
    assert!(!updated.show_countdown);
    assert!(updated.winner_pending);
    assert!(updated.show_title, "untouched field keeps its value");
    assert_eq!(updated.current_call_index, 1, "pointer is not patchable");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_remaining_in_round_counts_uncalled_tracks(pool: PgPool) {
    let session_id = running_session(&pool).await;

    // Round 1 holds calls 1-9; call 1 is called, 2 is auto-cued.
    let remaining = CallRepo::remaining_in_round(&pool, session_id, 1)
        .await
        .unwrap();
    assert_eq!(remaining, 8);
}
