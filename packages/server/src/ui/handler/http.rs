//! Admin HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    infrastructure::dto::http::{HealthDto, SessionSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// List active sessions in registry order
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummaryDto>> {
    let sessions = state.registry.snapshot().await;

    Json(
        sessions
            .iter()
            .map(|s| SessionSummaryDto {
                session_id: s.id().to_string(),
                identity: s.identity().as_str().to_string(),
                peer_addr: s.peer_addr().to_string(),
                connected_at: timestamp_to_jst_rfc3339(s.connected_at().value()),
            })
            .collect(),
    )
}
