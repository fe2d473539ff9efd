use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use super::{BookingStore, DateRange};
use crate::models::{
    Booking, BookingPatch, CalendarId, Holiday, HolidayPatch, NewBooking, NewHoliday, NewUser, Role, User,
};
use crate::services::cache::{CacheKey, TtlCache};
use crate::services::clock::Clock;

/// Read-through cache in front of a store.
///
/// Successful writes invalidate the affected calendar before returning, so the next read after a
/// write always reaches the store.
pub struct CachedStore {
    inner: Arc<dyn BookingStore>,
    bookings: TtlCache<Vec<Booking>>,
    holidays: TtlCache<Vec<Holiday>>,
}

impl CachedStore {
    pub fn new(inner: Arc<dyn BookingStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            bookings: TtlCache::new(ttl, Arc::clone(&clock)),
            holidays: TtlCache::new(ttl, clock),
        }
    }

    /// The uncached store, for reads that must be authoritative.
    pub fn inner(&self) -> &dyn BookingStore {
        self.inner.as_ref()
    }

    pub fn invalidate(&self, calendar: CalendarId) {
        self.bookings.invalidate_calendar(calendar);
        self.holidays.invalidate_calendar(calendar);
    }

    fn invalidate_all(&self) {
        self.bookings.clear();
        self.holidays.clear();
    }
}

#[async_trait]
impl BookingStore for CachedStore {
    async fn list_bookings(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Booking>> {
        let key = CacheKey { calendar, range };
        if let Some(hit) = self.bookings.get(&key) {
            tracing::debug!(calendar = %calendar, "booking cache hit");
            return Ok(hit);
        }
        let bookings = self.inner.list_bookings(calendar, range).await?;
        self.bookings.insert(key, bookings.clone());
        Ok(bookings)
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        self.inner.get_booking(id).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> anyhow::Result<Booking> {
        let created = self.inner.create_booking(booking).await?;
        self.invalidate(created.calendar);
        Ok(created)
    }

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> anyhow::Result<Booking> {
        let updated = self.inner.update_booking(id, patch).await?;
        self.invalidate(updated.calendar);
        Ok(updated)
    }

    async fn delete_booking(&self, id: &str) -> anyhow::Result<()> {
        self.inner.delete_booking(id).await?;
        // The id alone does not say which calendar it belonged to
        self.invalidate_all();
        Ok(())
    }

    async fn list_holidays(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Holiday>> {
        let key = CacheKey { calendar, range };
        if let Some(hit) = self.holidays.get(&key) {
            tracing::debug!(calendar = %calendar, "holiday cache hit");
            return Ok(hit);
        }
        let holidays = self.inner.list_holidays(calendar, range).await?;
        self.holidays.insert(key, holidays.clone());
        Ok(holidays)
    }

    async fn get_holiday(&self, id: &str) -> anyhow::Result<Option<Holiday>> {
        self.inner.get_holiday(id).await
    }

    async fn create_holiday(&self, holiday: &NewHoliday) -> anyhow::Result<Holiday> {
        let created = self.inner.create_holiday(holiday).await?;
        self.invalidate(created.calendar);
        Ok(created)
    }

    async fn update_holiday(&self, id: &str, patch: &HolidayPatch) -> anyhow::Result<Holiday> {
        let updated = self.inner.update_holiday(id, patch).await?;
        self.invalidate(updated.calendar);
        Ok(updated)
    }

    async fn delete_holiday(&self, id: &str) -> anyhow::Result<()> {
        self.inner.delete_holiday(id).await?;
        self.invalidate_all();
        Ok(())
    }

    async fn list_users(&self, role: Option<Role>) -> anyhow::Result<Vec<User>> {
        self.inner.list_users(role).await
    }

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        self.inner.create_user(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BookingDetails, Slot};
    use crate::services::clock::ManualClock;
    use crate::store::sqlite::SqliteStore;
    use chrono::NaiveDate;

    fn setup() -> (Arc<ManualClock>, Arc<SqliteStore>, CachedStore) {
        let clock = Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(),
        ));
        let sqlite = Arc::new(SqliteStore::new(
            db::init_db(":memory:").unwrap(),
            clock.clone(),
        ));
        let cached = CachedStore::new(sqlite.clone(), Duration::seconds(30), clock.clone());
        (clock, sqlite, cached)
    }

    fn new_booking() -> NewBooking {
        NewBooking {
            calendar: CalendarId::Pose,
            date: NaiveDate::from_ymd_opt(2025, 11, 18).unwrap(),
            slot: Slot::FullDay,
            details: BookingDetails {
                client_name: "Martin".to_string(),
                client_phone: "0601020304".to_string(),
                designer_name: "Claire".to_string(),
                message: None,
            },
        }
    }

    #[tokio::test]
    async fn test_reads_are_cached_until_ttl() {
        let (clock, sqlite, cached) = setup();
        assert!(cached
            .list_bookings(CalendarId::Pose, DateRange::default())
            .await
            .unwrap()
            .is_empty());

        // Written behind the cache's back
        sqlite.create_booking(&new_booking()).await.unwrap();
        assert!(cached
            .list_bookings(CalendarId::Pose, DateRange::default())
            .await
            .unwrap()
            .is_empty());

        clock.advance(Duration::seconds(31));
        assert_eq!(
            cached
                .list_bookings(CalendarId::Pose, DateRange::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_write_invalidates_immediately() {
        let (_clock, _sqlite, cached) = setup();
        cached
            .list_bookings(CalendarId::Pose, DateRange::default())
            .await
            .unwrap();

        cached.create_booking(&new_booking()).await.unwrap();
        assert_eq!(
            cached
                .list_bookings(CalendarId::Pose, DateRange::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_invalidates_every_calendar() {
        let (_clock, _sqlite, cached) = setup();
        let created = cached.create_booking(&new_booking()).await.unwrap();
        cached
            .list_bookings(CalendarId::Pose, DateRange::default())
            .await
            .unwrap();

        cached.delete_booking(&created.id).await.unwrap();
        assert!(cached
            .list_bookings(CalendarId::Pose, DateRange::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_holiday_write_invalidates_holiday_reads() {
        let (_clock, _sqlite, cached) = setup();
        cached
            .list_holidays(CalendarId::Pose, DateRange::default())
            .await
            .unwrap();
        cached
            .create_holiday(&NewHoliday {
                calendar: CalendarId::Pose,
                date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
                description: "Noël".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            cached
                .list_holidays(CalendarId::Pose, DateRange::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
