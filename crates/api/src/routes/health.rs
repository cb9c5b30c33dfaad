//! Health check endpoint.
//!
//! Reports database reachability and the main cashbox the server resolved
//! at startup, so a probe can tell a live instance from one whose database
//! went away after boot.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the database answers, "degraded" otherwise.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the database answered a ping.
    pub database: bool,
    /// The main cashbox this instance serves.
    pub main_box_id: Uuid,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        main_box_id: state.main_box_id,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let body = serde_json::to_value(HealthResponse {
            status: "healthy",
            version: "0.1.0",
            database: true,
            main_box_id: Uuid::nil(),
        })
        .unwrap();

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], true);
        assert_eq!(body["main_box_id"], Uuid::nil().to_string());
    }
}
