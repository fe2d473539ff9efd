use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::{parse_calendar, RangeQuery};
use crate::models::{CalendarId, DayFilter, DayStatus, Slot, ALL_CALENDARS};
use crate::services::duration::{duration_options, DurationOption, MAX_LOOKAHEAD_DAYS};
use crate::services::occupancy::compute_occupancy;
use crate::state::AppState;
use crate::store::{BookingStore, DateRange};

// GET /api/calendars
#[derive(Serialize)]
pub struct CalendarResponse {
    id: CalendarId,
    name: &'static str,
    max_bookings_per_day: usize,
    uses_time_slots: bool,
    slots: &'static [Slot],
    supports_duration: bool,
}

pub async fn list_calendars() -> Json<Vec<CalendarResponse>> {
    let calendars = ALL_CALENDARS
        .iter()
        .map(|id| {
            let rules = id.rules();
            CalendarResponse {
                id: *id,
                name: id.display_name(),
                max_bookings_per_day: rules.max_bookings_per_day,
                uses_time_slots: rules.uses_time_slots,
                slots: rules.slot_catalog,
                supports_duration: id.supports_duration(),
            }
        })
        .collect();
    Json(calendars)
}

// GET /api/calendars/:calendar/occupancy
#[derive(Serialize)]
pub struct DayEntry {
    date: NaiveDate,
    #[serde(flatten)]
    status: DayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    free_slots: Option<Vec<Slot>>,
}

#[derive(Serialize)]
pub struct OccupancyResponse {
    calendar: CalendarId,
    capacity: usize,
    days: Vec<DayEntry>,
}

pub async fn get_occupancy(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<OccupancyResponse>, AppError> {
    let calendar = parse_calendar(&calendar)?;
    let today = state.clock.today();
    let (start, end) = query.resolve(today)?;
    let range = DateRange::between(start, end);

    let holidays = state.store.list_holidays(calendar, range).await?;
    let bookings = state.store.list_bookings(calendar, range).await?;

    let filter = DayFilter::from_holidays(calendar, today, &holidays);
    let view = compute_occupancy(calendar, &bookings, today);
    let uses_slots = calendar.rules().uses_time_slots;

    let days = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let status = view.day_status(date, &filter);
            let free_slots = (uses_slots && !status.is_disabled()).then(|| view.free_slots(date));
            DayEntry {
                date,
                status,
                free_slots,
            }
        })
        .collect();

    Ok(Json(OccupancyResponse {
        calendar,
        capacity: view.capacity(),
        days,
    }))
}

// GET /api/calendars/:calendar/durations
#[derive(Deserialize)]
pub struct DurationQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct DurationsResponse {
    calendar: CalendarId,
    date: NaiveDate,
    options: Vec<DurationOption>,
}

pub async fn get_durations(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    Query(query): Query<DurationQuery>,
) -> Result<Json<DurationsResponse>, AppError> {
    let calendar = parse_calendar(&calendar)?;
    if !calendar.supports_duration() {
        return Err(AppError::BadRequest(format!(
            "the {calendar} calendar does not take multi-day bookings"
        )));
    }

    let today = state.clock.today();
    let horizon = query
        .date
        .checked_add_days(Days::new(MAX_LOOKAHEAD_DAYS * 2))
        .unwrap_or(query.date);
    let range = DateRange::between(query.date, horizon);

    let holidays = state.store.list_holidays(calendar, range).await?;
    let bookings = state.store.list_bookings(calendar, range).await?;

    let filter = DayFilter::from_holidays(calendar, today, &holidays);
    let view = compute_occupancy(calendar, &bookings, today);

    Ok(Json(DurationsResponse {
        calendar,
        date: query.date,
        options: duration_options(query.date, &view, &filter),
    }))
}
