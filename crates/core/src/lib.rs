//! Needledrop domain core.
//!
//! Pure game logic for the live vinyl-bingo engine: deck and card
//! generation, the transport state machine, session lifecycle rules,
//! countdown pacing, and join-code generation. This crate performs no
//! I/O (zero internal deps) so the API and persistence layers -- and any
//! future worker or CLI tooling -- can all share it.

pub mod cards;
pub mod deck;
pub mod error;
pub mod lifecycle;
pub mod modes;
pub mod pacing;
pub mod session_code;
pub mod transport;
pub mod types;
