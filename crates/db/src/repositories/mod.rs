//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Plain reads/writes return
//! `sqlx::Error`; operations that validate domain rules inside a
//! transaction return [`DbError`](crate::DbError).

pub mod call_repo;
pub mod card_repo;
pub mod event_repo;
pub mod playlist_repo;
pub mod session_repo;
pub mod transport_repo;

pub use call_repo::CallRepo;
pub use card_repo::CardRepo;
pub use event_repo::EventRepo;
pub use playlist_repo::PlaylistRepo;
pub use session_repo::SessionRepo;
pub use transport_repo::{TransportOutcome, TransportRepo};
