//! HTTP API response DTOs for the admin endpoints.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Active session entry for the session list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummaryDto {
    pub session_id: String,
    pub identity: String,
    pub peer_addr: String,
    pub connected_at: String, // ISO 8601
}
