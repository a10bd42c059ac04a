//! Shared query parameter types for API handlers.

use needledrop_core::types::DbId;
use serde::Deserialize;

/// `?playlist_id=` filter for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListParams {
    pub playlist_id: Option<DbId>,
}

/// `?round=` filter for the call listing.
#[derive(Debug, Deserialize)]
pub struct CallListParams {
    pub round: Option<i32>,
}

/// `?limit=` for the event log. Clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub limit: Option<i64>,
}
