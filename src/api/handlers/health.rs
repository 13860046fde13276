//! Liveness, readiness and component health.

use std::collections::HashMap;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use diesel_async::RunQueryDsl;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Per-component report. 503 when any component is unhealthy.
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "All components healthy", body = HealthResponse),
        (status = 503, description = "At least one component unhealthy", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let checks = HashMap::from([("database".to_owned(), check_database(&state).await)]);
    let status = if checks.values().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let report = HealthResponse {
        status,
        version: crate::pkg_version().to_owned(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    };
    (http_status(status), Json(report))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    )
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    http_status(check_database(&state).await.status)
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Process is up"))
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn http_status(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Checks out a pooled connection and runs `SELECT 1` on it.
async fn check_database(state: &AppState) -> ComponentHealth {
    let started = Instant::now();
    let result = async {
        let mut conn = state
            .db
            .pool()
            .get()
            .await
            .map_err(|e| format!("no connection: {e}"))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(|e| format!("SELECT 1 failed: {e}"))
    }
    .await;
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (status, message) = match result {
        Ok(_) => (HealthStatus::Healthy, "SELECT 1 ok".to_owned()),
        Err(message) => {
            tracing::warn!(%message, "database check failed");
            (HealthStatus::Unhealthy, message)
        }
    };
    ComponentHealth {
        status,
        message: Some(message),
        response_time_ms: Some(elapsed),
    }
}
