use needledrop_core::error::CoreError;

/// Error type for repository operations that validate domain rules
/// inside a transaction (transport, lifecycle, session creation).
///
/// Plain read/write repositories return `sqlx::Error` directly; this
/// union exists for the operations where a transaction can fail either
/// on the database or on a rejected transition.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
