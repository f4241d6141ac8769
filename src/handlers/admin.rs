use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::Appointment;
use crate::services::booking;
use crate::state::AppState;

#[allow(clippy::result_large_err)]
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), Response> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "unauthorized"})),
        )
            .into_response());
    }
    Ok(())
}

// GET /api/admin/appointments
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Appointment>>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let appointments = {
        let db = state.db.lock().unwrap();
        booking::list_appointments(&db).map_err(|e| e.into_response())?
    };

    Ok(Json(appointments))
}

// POST /api/admin/appointments/:id/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let cancelled = {
        let mut db = state.db.lock().unwrap();
        booking::cancel_appointment(&mut db, &id).map_err(|e| e.into_response())?
    };

    Ok(Json(serde_json::json!({
        "cancelled": cancelled.id,
        "date": cancelled.date,
        "time": cancelled.time,
    })))
}

// POST /api/admin/appointments/:id/paid
pub async fn toggle_paid(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let paid = {
        let db = state.db.lock().unwrap();
        booking::toggle_paid(&db, &id).map_err(|e| e.into_response())?
    };

    Ok(Json(serde_json::json!({ "id": id, "paid": paid })))
}
