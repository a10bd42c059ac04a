use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Playlist {playlist_id} has no tracks")]
    PoolNotFound { playlist_id: DbId },

    #[error("Track pool too small: need {needed} tracks, have {have}")]
    InsufficientPool { needed: usize, have: usize },

    #[error("Ordering violation: current call index is {current}, requested index {requested}")]
    OrderingViolation { current: i32, requested: i32 },

    #[error("Conflicting state: {0}")]
    ConflictingState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
