use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::{actor_from_headers, parse_calendar, require_admin, RangeQuery};
use crate::models::{Holiday, HolidayPatch, NewHoliday, NewUser, Role};
use crate::state::AppState;
use crate::store::BookingStore;

// GET /api/calendars/:calendar/holidays
pub async fn list_holidays(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppError> {
    let calendar = parse_calendar(&calendar)?;
    let range = query.range(state.clock.today())?;
    let holidays = state.store.list_holidays(calendar, range).await?;
    Ok(Json(serde_json::json!({ "calendar": calendar, "holidays": holidays })).into_response())
}

// POST /api/calendars/:calendar/holidays
#[derive(Deserialize)]
pub struct CreateHolidayRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

pub async fn create_holiday(
    State(state): State<Arc<AppState>>,
    Path(calendar): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CreateHolidayRequest>,
) -> Result<Response, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    let calendar = parse_calendar(&calendar)?;

    let holiday = state
        .store
        .create_holiday(&NewHoliday {
            calendar,
            date: body.date,
            description: body.description.trim().to_string(),
        })
        .await?;

    tracing::info!(calendar = %calendar, date = %holiday.date, "holiday added");
    Ok((StatusCode::CREATED, Json(holiday)).into_response())
}

async fn find_holiday(state: &AppState, id: &str) -> Result<Holiday, AppError> {
    state
        .store
        .get_holiday(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("holiday {id}")))
}

// PATCH /api/holidays/:id
pub async fn update_holiday(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<HolidayPatch>,
) -> Result<Response, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    find_holiday(&state, &id).await?;
    let holiday = state.store.update_holiday(&id, &patch).await?;
    tracing::info!(holiday_id = %id, date = %holiday.date, "holiday updated");
    Ok(Json(holiday).into_response())
}

// DELETE /api/holidays/:id
pub async fn delete_holiday(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    let holiday = find_holiday(&state, &id).await?;
    state.store.delete_holiday(&id).await?;
    tracing::info!(holiday_id = %id, calendar = %holiday.calendar, "holiday removed");
    Ok(Json(serde_json::json!({ "ok": true })).into_response())
}

// GET /api/users
#[derive(Deserialize)]
pub struct UsersQuery {
    pub role: Option<String>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    actor_from_headers(&headers, &state.config.admin_token)?;
    let role = match query.role.as_deref() {
        Some(raw) => Some(
            Role::parse(raw).ok_or_else(|| AppError::BadRequest(format!("unknown role {raw}")))?,
        ),
        None => None,
    };
    let users = state.store.list_users(role).await?;
    Ok(Json(serde_json::json!({ "users": users })).into_response())
}

// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewUser>,
) -> Result<Response, AppError> {
    require_admin(&headers, &state.config.admin_token)?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if body.role == Role::Admin {
        return Err(AppError::BadRequest(
            "administrators are identified by token".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(&NewUser {
            name: name.to_string(),
            email: body.email.trim().to_string(),
            phone: body.phone.trim().to_string(),
            role: body.role,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user added");
    Ok((StatusCode::CREATED, Json(user)).into_response())
}
