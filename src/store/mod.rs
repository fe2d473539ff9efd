pub mod cached;
pub mod http;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    Booking, BookingPatch, CalendarId, Holiday, HolidayPatch, NewBooking, NewHoliday, NewUser, Role, User,
};

pub use cached::CachedStore;

/// Optional inclusive bounds on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// The booking/holiday/user backend. Every call may fail or take arbitrarily long.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_bookings(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Booking>>;

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>>;

    async fn create_booking(&self, booking: &NewBooking) -> anyhow::Result<Booking>;

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> anyhow::Result<Booking>;

    async fn delete_booking(&self, id: &str) -> anyhow::Result<()>;

    async fn list_holidays(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Holiday>>;

    async fn get_holiday(&self, id: &str) -> anyhow::Result<Option<Holiday>>;

    async fn create_holiday(&self, holiday: &NewHoliday) -> anyhow::Result<Holiday>;

    async fn update_holiday(&self, id: &str, patch: &HolidayPatch) -> anyhow::Result<Holiday>;

    async fn delete_holiday(&self, id: &str) -> anyhow::Result<()>;

    async fn list_users(&self, role: Option<Role>) -> anyhow::Result<Vec<User>>;

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User>;
}
