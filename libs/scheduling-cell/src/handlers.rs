// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AppointmentInterval, AppointmentRecord, AppointmentStatus, SchedulingError, Slot, TimeOfDay,
    WorkingHours,
};
use crate::services::{
    available_slots_for_day, count_by_status, generate_slots, resolve_date_range,
    AppointmentLifecycleService,
};

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

// ==============================================================================
// REQUEST STRUCTS
// ==============================================================================

/// Appointment timestamps may be offset-free (`2024-03-04T08:00:00`) or
/// RFC 3339; an offset is dropped and the wall-clock reading kept.
#[derive(Debug, Deserialize)]
pub struct SlotsRequest {
    pub duration_minutes: Option<i32>,
    pub window_start: TimeOfDay,
    pub window_end: TimeOfDay,
    #[serde(default)]
    pub appointments: Vec<AppointmentInterval>,
}

#[derive(Debug, Deserialize)]
pub struct DaySlotsRequest {
    pub duration_minutes: Option<i32>,
    pub date: NaiveDate,
    /// Defaults to the server's local date.
    pub today: Option<NaiveDate>,
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub view: String,
    pub day: NaiveDate,
    /// Zero-based; defaults to the month of `day`.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusTransitionRequest {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

// ==============================================================================
// HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let duration = request.duration_minutes.unwrap_or(state.default_slot_duration_minutes);

    let generator = generate_slots(
        duration,
        request.window_start,
        request.window_end,
        &request.appointments,
    )?;
    let slots: Vec<Slot> = generator.iter().collect();

    debug!("Returning {} slot(s)", slots.len());
    Ok(Json(json!({
        "duration_minutes": generator.duration_minutes(),
        "slots": slots,
    })))
}

#[axum::debug_handler]
pub async fn list_day_slots(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<DaySlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let duration = request.duration_minutes.unwrap_or(state.default_slot_duration_minutes);
    let today = request
        .today
        .unwrap_or_else(|| chrono::Local::now().naive_local().date());
    let open = request.working_hours.window_for_date(request.date).is_some();

    let slots = available_slots_for_day(
        duration,
        request.date,
        &request.working_hours,
        &request.appointments,
        today,
    )?;

    Ok(Json(json!({
        "date": request.date,
        "open": open,
        "duration_minutes": duration,
        "slots": slots,
    })))
}

#[axum::debug_handler]
pub async fn get_date_range(
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let month = query.month.unwrap_or_else(|| query.day.month0());
    let year = query.year.unwrap_or_else(|| query.day.year());

    let range = resolve_date_range(&query.view, query.day, month, year)?;

    Ok(Json(json!({
        "view": query.view,
        "start": range.start,
        "end": range.end,
    })))
}

#[axum::debug_handler]
pub async fn count_statuses(
    Json(appointments): Json<Vec<AppointmentRecord>>,
) -> Result<Json<Value>, AppError> {
    let counts = count_by_status(&appointments);
    Ok(Json(json!(counts)))
}

#[axum::debug_handler]
pub async fn transition_status(
    Json(request): Json<StatusTransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new();
    let status = lifecycle.transition(request.from, request.to)?;

    Ok(Json(json!({
        "status": status,
        "terminal": status.is_terminal(),
        "next": lifecycle.get_valid_transitions(status),
    })))
}
