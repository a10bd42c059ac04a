//! Repository for the `playlists` and `playlist_tracks` tables.
//!
//! The engine treats these as the collection platform's data: reads
//! only, apart from the seeding helpers used by tests and local demos.

use needledrop_core::types::DbId;
use sqlx::PgPool;

use crate::models::playlist::{NewPlaylistTrack, Playlist, PlaylistTrack};

/// Column list for `playlists` queries.
const PLAYLIST_COLUMNS: &str = "id, name, created_at, updated_at";

/// Column list for `playlist_tracks` queries.
const TRACK_COLUMNS: &str =
    r#"id, playlist_id, sort_order, title, artist, album, side, "position", created_at"#;

/// Provides read (and seed) operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Playlist, sqlx::Error> {
        let query =
            format!("INSERT INTO playlists (name) VALUES ($1) RETURNING {PLAYLIST_COLUMNS}");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a track to a playlist (test/demo seeding).
    pub async fn add_track(
        pool: &PgPool,
        playlist_id: DbId,
        track: &NewPlaylistTrack,
    ) -> Result<PlaylistTrack, sqlx::Error> {
        let query = format!(
            r#"INSERT INTO playlist_tracks
                (playlist_id, sort_order, title, artist, album, side, "position")
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TRACK_COLUMNS}"#
        );
        sqlx::query_as::<_, PlaylistTrack>(&query)
            .bind(playlist_id)
            .bind(track.sort_order)
            .bind(&track.title)
            .bind(&track.artist)
            .bind(&track.album)
            .bind(&track.side)
            .bind(&track.position)
            .fetch_one(pool)
            .await
    }

    /// The ordered track pool a session draws from.
    pub async fn list_tracks(
        pool: &PgPool,
        playlist_id: DbId,
    ) -> Result<Vec<PlaylistTrack>, sqlx::Error> {
        let query = format!(
            "SELECT {TRACK_COLUMNS} FROM playlist_tracks \
             WHERE playlist_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, PlaylistTrack>(&query)
            .bind(playlist_id)
            .fetch_all(pool)
            .await
    }
}
