pub mod admin;
pub mod bookings;
pub mod calendar;
pub mod calendars;
pub mod health;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, patch};
use axum::Router;
use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Actor, CalendarId, Role};
use crate::state::AppState;
use crate::store::DateRange;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/calendars", get(calendars::list_calendars))
        .route(
            "/api/calendars/:calendar/occupancy",
            get(calendars::get_occupancy),
        )
        .route(
            "/api/calendars/:calendar/durations",
            get(calendars::get_durations),
        )
        .route(
            "/api/calendars/:calendar/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            patch(bookings::update_booking).delete(bookings::delete_booking),
        )
        .route(
            "/api/calendars/:calendar/holidays",
            get(admin::list_holidays).post(admin::create_holiday),
        )
        .route(
            "/api/holidays/:id",
            patch(admin::update_holiday).delete(admin::delete_holiday),
        )
        .route("/api/users", get(admin::list_users).post(admin::create_user))
        .route("/calendar/:booking_id", get(calendar::download_ics))
        .with_state(state)
}

/// Resolve who is calling. The admin token wins; otherwise the actor headers are required.
pub fn actor_from_headers(headers: &HeaderMap, admin_token: &str) -> Result<Actor, AppError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let auth = header("authorization");
    if let Some(token) = auth.strip_prefix("Bearer ") {
        if !admin_token.is_empty() && token == admin_token {
            return Ok(Actor::admin());
        }
        return Err(AppError::Unauthorized);
    }

    let role = Role::parse(&header("x-actor-role")).ok_or(AppError::Unauthorized)?;
    if role == Role::Admin {
        return Err(AppError::Unauthorized);
    }

    Ok(Actor {
        role,
        name: header("x-actor-name"),
        email: header("x-actor-email"),
        phone: header("x-actor-phone"),
    })
}

pub fn require_admin(headers: &HeaderMap, admin_token: &str) -> Result<Actor, AppError> {
    let actor = actor_from_headers(headers, admin_token)?;
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden("administrators only".to_string()));
    }
    Ok(actor)
}

pub fn parse_calendar(raw: &str) -> Result<CalendarId, AppError> {
    CalendarId::parse(raw).ok_or_else(|| AppError::NotFound(format!("calendar {raw}")))
}

/// Default listing window: six weeks from today.
const DEFAULT_WINDOW_DAYS: u64 = 41;
const MAX_WINDOW_DAYS: i64 = 366;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = self.start.unwrap_or(today);
        let end = match self.end {
            Some(end) => end,
            None => start
                .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(start),
        };
        if end < start {
            return Err(AppError::BadRequest("end is before start".to_string()));
        }
        if (end - start).num_days() > MAX_WINDOW_DAYS {
            return Err(AppError::BadRequest(format!(
                "range is limited to {MAX_WINDOW_DAYS} days"
            )));
        }
        Ok((start, end))
    }

    pub fn range(&self, today: NaiveDate) -> Result<DateRange, AppError> {
        let (start, end) = self.resolve(today)?;
        Ok(DateRange::between(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_admin_token() {
        let actor = actor_from_headers(&headers(&[("authorization", "Bearer secret")]), "secret")
            .unwrap();
        assert_eq!(actor.role, Role::Admin);
        assert!(actor_from_headers(&headers(&[("authorization", "Bearer nope")]), "secret").is_err());
    }

    #[test]
    fn test_actor_headers() {
        let actor = actor_from_headers(
            &headers(&[("x-actor-role", "designer"), ("x-actor-name", " Claire ")]),
            "secret",
        )
        .unwrap();
        assert_eq!(actor.role, Role::Designer);
        assert_eq!(actor.name, "Claire");
    }

    #[test]
    fn test_admin_cannot_be_claimed_by_header() {
        let result = actor_from_headers(&headers(&[("x-actor-role", "admin")]), "secret");
        assert!(matches!(result, Err(AppError::Unauthorized)));
        assert!(matches!(
            actor_from_headers(&HeaderMap::new(), "secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_range_defaults_and_limits() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let q = RangeQuery {
            start: None,
            end: None,
        };
        let (start, end) = q.resolve(today).unwrap();
        assert_eq!(start, today);
        assert_eq!((end - start).num_days(), 41);

        let backwards = RangeQuery {
            start: Some(today),
            end: NaiveDate::from_ymd_opt(2025, 11, 1),
        };
        assert!(backwards.resolve(today).is_err());
    }
}
