use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use super::{BookingStore, DateRange};
use crate::db::queries;
use crate::models::{
    Booking, BookingPatch, CalendarId, Holiday, HolidayPatch, NewBooking, NewHoliday, NewUser, Role, User,
};
use crate::services::clock::Clock;

/// Local store used when no remote backend is configured.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    pub fn new(conn: Connection, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            clock,
        }
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.db)
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn list_bookings(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Booking>> {
        let db = self.db.lock().unwrap();
        queries::list_bookings(&db, calendar, range)
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let db = self.db.lock().unwrap();
        queries::get_booking(&db, id)
    }

    async fn create_booking(&self, booking: &NewBooking) -> anyhow::Result<Booking> {
        let created = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            calendar: booking.calendar,
            date: booking.date,
            slot: booking.slot.label().to_string(),
            client_name: booking.details.client_name.clone(),
            client_phone: booking.details.client_phone.clone(),
            designer_name: booking.details.designer_name.clone(),
            message: booking.details.message.clone(),
            created_at: self.clock.now(),
        };
        let db = self.db.lock().unwrap();
        queries::insert_booking(&db, &created)?;
        Ok(created)
    }

    async fn update_booking(&self, id: &str, patch: &BookingPatch) -> anyhow::Result<Booking> {
        let db = self.db.lock().unwrap();
        let mut booking = queries::get_booking(&db, id)?
            .ok_or_else(|| anyhow::anyhow!("booking not found: {id}"))?;
        patch.apply(&mut booking);
        queries::update_booking(&db, &booking)?;
        Ok(booking)
    }

    async fn delete_booking(&self, id: &str) -> anyhow::Result<()> {
        let db = self.db.lock().unwrap();
        if !queries::delete_booking(&db, id)? {
            anyhow::bail!("booking not found: {id}");
        }
        Ok(())
    }

    async fn list_holidays(
        &self,
        calendar: CalendarId,
        range: DateRange,
    ) -> anyhow::Result<Vec<Holiday>> {
        let db = self.db.lock().unwrap();
        queries::list_holidays(&db, calendar, range)
    }

    async fn get_holiday(&self, id: &str) -> anyhow::Result<Option<Holiday>> {
        let db = self.db.lock().unwrap();
        queries::get_holiday(&db, id)
    }

    async fn create_holiday(&self, holiday: &NewHoliday) -> anyhow::Result<Holiday> {
        let created = Holiday {
            id: uuid::Uuid::new_v4().to_string(),
            calendar: holiday.calendar,
            date: holiday.date,
            description: holiday.description.clone(),
        };
        let db = self.db.lock().unwrap();
        queries::insert_holiday(&db, &created)?;
        Ok(created)
    }

    async fn update_holiday(&self, id: &str, patch: &HolidayPatch) -> anyhow::Result<Holiday> {
        let db = self.db.lock().unwrap();
        let mut holiday = queries::get_holiday(&db, id)?
            .ok_or_else(|| anyhow::anyhow!("holiday not found: {id}"))?;
        if let Some(date) = patch.date {
            holiday.date = date;
        }
        if let Some(description) = &patch.description {
            holiday.description = description.clone();
        }
        queries::update_holiday(&db, &holiday)?;
        Ok(holiday)
    }

    async fn delete_holiday(&self, id: &str) -> anyhow::Result<()> {
        let db = self.db.lock().unwrap();
        if !queries::delete_holiday(&db, id)? {
            anyhow::bail!("holiday not found: {id}");
        }
        Ok(())
    }

    async fn list_users(&self, role: Option<Role>) -> anyhow::Result<Vec<User>> {
        let db = self.db.lock().unwrap();
        queries::list_users(&db, role)
    }

    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let created = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
        };
        let db = self.db.lock().unwrap();
        queries::save_user(&db, &created)?;
        Ok(created)
    }
}
