use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::{actor_from_headers, parse_calendar, RangeQuery};
use crate::models::{BookingDetails, BookingPatch, Role};
use crate::services::admission::{Admission, AdmissionResult, BookingRequest};
use crate::services::duration::WorkDays;
use crate::services::ownership::visible_bookings;
use crate::state::AppState;
use crate::store::BookingStore;

// GET /api/calendars/:calendar/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(&headers, &state.config.admin_token)?;
    let calendar = parse_calendar(&calendar)?;
    let range = query.range(state.clock.today())?;

    let bookings = state.store.list_bookings(calendar, range).await?;
    let visible = visible_bookings(state.ownership.as_ref(), &actor, bookings);

    Ok(Json(serde_json::json!({ "calendar": calendar, "bookings": visible })).into_response())
}

// POST /api/calendars/:calendar/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub duration: Option<WorkDays>,
    #[serde(flatten)]
    pub details: BookingDetails,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(&headers, &state.config.admin_token)?;
    let calendar = parse_calendar(&calendar)?;

    if body.details.client_name.trim().is_empty() {
        return Err(AppError::BadRequest("client_name is required".to_string()));
    }

    let mut details = body.details;
    // Designers booking for themselves may leave their own name out
    if details.designer_name.trim().is_empty() && actor.role == Role::Designer {
        details.designer_name = actor.name.clone();
    }

    let request = BookingRequest {
        calendar,
        date: body.date,
        slot: body.slot,
        duration: body.duration.unwrap_or(WorkDays::One),
        details,
    };

    let admission = Admission::new(&state.store, state.clock.as_ref());
    match admission.admit(&request).await? {
        AdmissionResult::Admitted(bookings) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "bookings": bookings })),
        )
            .into_response()),
        AdmissionResult::Rejected(rejection) => Err(rejection.into()),
        AdmissionResult::PartialBatch {
            created,
            failed_on,
            cause,
        } => Ok((
            StatusCode::MULTI_STATUS,
            Json(serde_json::json!({
                "created_count": created.len(),
                "bookings": created,
                "failed_on": failed_on,
                "error": cause.to_string(),
            })),
        )
            .into_response()),
    }
}

// PATCH /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut patch): Json<BookingPatch>,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(&headers, &state.config.admin_token)?;
    let booking = state
        .store
        .get_booking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !state.ownership.capabilities(&actor, &booking).edit {
        return Err(AppError::Forbidden(
            "this booking belongs to someone else".to_string(),
        ));
    }

    let admission = Admission::new(&state.store, state.clock.as_ref());
    let landing = admission.check_move(&booking, &patch).await?;
    if let Some(slot) = landing {
        patch.slot = Some(slot.label().to_string());
    }

    let updated = state.store.update_booking(&id, &patch).await?;
    tracing::info!(booking_id = %id, moved = patch.moves_booking(), "booking updated");
    Ok(Json(updated).into_response())
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(&headers, &state.config.admin_token)?;
    let booking = state
        .store
        .get_booking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !state.ownership.capabilities(&actor, &booking).delete {
        return Err(AppError::Forbidden(
            "this booking belongs to someone else".to_string(),
        ));
    }

    state.store.delete_booking(&id).await?;
    tracing::info!(booking_id = %id, calendar = %booking.calendar, "booking deleted");
    Ok(Json(serde_json::json!({ "ok": true })).into_response())
}
