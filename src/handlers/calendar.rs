use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;
use crate::handlers::actor_from_headers;
use crate::services::calendar::generate_ics;
use crate::state::AppState;
use crate::store::BookingStore;

pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(&headers, &state.config.admin_token)?;
    // Strip .ics suffix if present
    let booking_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let booking = state
        .store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    if !state.ownership.capabilities(&actor, &booking).view_details {
        return Err(AppError::Forbidden(
            "this booking belongs to someone else".to_string(),
        ));
    }

    let ics = generate_ics(&booking, &state.config.company_name);
    let filename = format!("{}-{}.ics", booking.calendar, booking.date);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
