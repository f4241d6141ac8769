use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::slots;
use crate::models::DayType;
use crate::services::availability;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    day_type: DayType,
    slots: Vec<&'static str>,
}

// GET /api/slots?date=YYYY-MM-DD
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid date: {}", query.date)))?;
    let day_type = slots::day_type(date);

    let reserved = {
        let db = state.db.lock().unwrap();
        queries::reserved_times(&db, date)?
    };
    let offers = availability::available_slots(date, &reserved, Local::now().naive_local());

    Ok(Json(SlotsResponse {
        date: query.date,
        day_type,
        slots: offers,
    }))
}
