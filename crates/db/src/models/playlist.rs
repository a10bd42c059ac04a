//! Playlist entity models (the collection platform's store, read-only to
//! the engine apart from test/demo seeding).

use needledrop_core::deck::PoolTrack;
use needledrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `playlist_tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistTrack {
    pub id: DbId,
    pub playlist_id: DbId,
    pub sort_order: i32,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub side: Option<String>,
    pub position: Option<String>,
    pub created_at: Timestamp,
}

impl PlaylistTrack {
    /// Project the row into the engine's pool-track shape.
    pub fn into_pool_track(self) -> PoolTrack {
        PoolTrack {
            title: self.title,
            artist: self.artist,
            album: self.album,
            side: self.side,
            position: self.position,
        }
    }
}

/// DTO for seeding a playlist track.
#[derive(Debug, Clone)]
pub struct NewPlaylistTrack {
    pub sort_order: i32,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub side: Option<String>,
    pub position: Option<String>,
}
