use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;

use crate::errors::AppError;
use crate::models::Appointment;
use crate::services::booking::{self, BookingRequest};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = {
        let mut db = state.db.lock().unwrap();
        booking::book_appointment(&mut db, &request, Local::now().naive_local())?
    };

    // Fire and forget: the booker never waits on the notification.
    let notify_state = Arc::clone(&state);
    let confirmed = appointment.clone();
    tokio::spawn(async move {
        if let Err(err) = notify_state.notifier.booking_confirmed(&confirmed).await {
            tracing::warn!("booking notification failed: {err:#}");
        }
    });

    Ok((StatusCode::CREATED, Json(appointment)))
}
