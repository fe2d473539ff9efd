use anyhow::Context;
use async_trait::async_trait;

use super::{BookingStore, DateRange};
use crate::models::{
    Booking, BookingPatch, CalendarId, Holiday, HolidayPatch, NewBooking, NewHoliday, NewUser, Role, User,
};

/// Booking store reached over its REST API.
pub struct HttpStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }
}

fn range_query(calendar: CalendarId, range: DateRange) -> Vec<(&'static str, String)> {
    let mut query = vec![("calendar", calendar.as_str().to_string())];
    if let Some(start) = range.start {
        query.push(("start", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = range.end {
        query.push(("end", end.format("%Y-%m-%d").to_string()));
    }
    query
}

#[async_trait]
impl BookingStore for HttpStore {
    async fn list_bookings(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Booking>> {
        self.request(reqwest::Method::GET, "/bookings")
            .query(&range_query(calendar, range))
            .send()
            .await
            .context("failed to list bookings")?
            .error_for_status()
            .context("booking store returned error")?
            .json()
            .await
            .context("failed to parse bookings")
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/bookings/{id}"))
            .send()
            .await
            .context("failed to fetch booking")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let booking = resp
            .error_for_status()
            .context("booking store returned error")?
            .json()
            .await
            .context("failed to parse booking")?;
        Ok(Some(booking))
    }

    async fn create_booking(&self, booking: &NewBooking) -> anyhow::Result<Booking> {
        self.request(reqwest::Method::POST, "/bookings")
            .json(booking)
            .send()
            .await
            .context("failed to create booking")?
            .error_for_status()
            .context("booking store rejected booking")?
            .json()
            .await
            .context("failed to parse created booking")
    }

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> anyhow::Result<Booking> {
        self.request(reqwest::Method::PATCH, &format!("/bookings/{id}"))
            .json(patch)
            .send()
            .await
            .context("failed to update booking")?
            .error_for_status()
            .context("booking store rejected update")?
            .json()
            .await
            .context("failed to parse updated booking")
    }

    async fn delete_booking(&self, id: &str) -> anyhow::Result<()> {
        self.request(reqwest::Method::DELETE, &format!("/bookings/{id}"))
            .send()
            .await
            .context("failed to delete booking")?
            .error_for_status()
            .context("booking store rejected delete")?;
        Ok(())
    }

    async fn list_holidays(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Holiday>> {
        self.request(reqwest::Method::GET, "/holidays")
            .query(&range_query(calendar, range))
            .send()
            .await
            .context("failed to list holidays")?
            .error_for_status()
            .context("booking store returned error")?
            .json()
            .await
            .context("failed to parse holidays")
    }

    async fn get_holiday(&self, id: &str) -> anyhow::Result<Option<Holiday>> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/holidays/{id}"))
            .send()
            .await
            .context("failed to fetch holiday")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let holiday = resp
            .error_for_status()
            .context("booking store returned error")?
            .json()
            .await
            .context("failed to parse holiday")?;
        Ok(Some(holiday))
    }

    async fn create_holiday(&self, holiday: &NewHoliday) -> anyhow::Result<Holiday> {
        self.request(reqwest::Method::POST, "/holidays")
            .json(holiday)
            .send()
            .await
            .context("failed to create holiday")?
            .error_for_status()
            .context("booking store rejected holiday")?
            .json()
            .await
            .context("failed to parse created holiday")
    }

    async fn update_holiday(&self, id: &str, patch: &HolidayPatch) -> anyhow::Result<Holiday> {
        self.request(reqwest::Method::PATCH, &format!("/holidays/{id}"))
            .json(patch)
            .send()
            .await
            .context("failed to update holiday")?
            .error_for_status()
            .context("booking store rejected holiday update")?
            .json()
            .await
            .context("failed to parse updated holiday")
    }

    async fn delete_holiday(&self, id: &str) -> anyhow::Result<()> {
        self.request(reqwest::Method::DELETE, &format!("/holidays/{id}"))
            .send()
            .await
            .context("failed to delete holiday")?
            .error_for_status()
            .context("booking store rejected holiday delete")?;
        Ok(())
    }

    async fn list_users(&self, role: Option<Role>) -> anyhow::Result<Vec<User>> {
        let mut builder = self.request(reqwest::Method::GET, "/users");
        if let Some(role) = role {
            builder = builder.query(&[("role", role.as_str())]);
        }
        builder
            .send()
            .await
            .context("failed to list users")?
            .error_for_status()
            .context("booking store returned error")?
            .json()
            .await
            .context("failed to parse users")
    }

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        self.request(reqwest::Method::POST, "/users")
            .json(user)
            .send()
            .await
            .context("failed to create user")?
            .error_for_status()
            .context("booking store rejected user")?
            .json()
            .await
            .context("failed to parse created user")
    }
}
