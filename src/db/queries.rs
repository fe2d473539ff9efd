use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, CalendarId, Holiday, Role, User};
use crate::store::DateRange;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn range_bounds(range: DateRange) -> (String, String) {
    let start = range
        .start
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "0000-01-01".to_string());
    let end = range
        .end
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "9999-12-31".to_string());
    (start, end)
}

fn parse_calendar(s: &str) -> rusqlite::Result<CalendarId> {
    CalendarId::parse(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown calendar: {s}").into(),
        )
    })
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, calendar, date, slot, client_name, client_phone, designer_name, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.calendar.as_str(),
            booking.date.format(DATE_FORMAT).to_string(),
            booking.slot,
            booking.client_name,
            booking.client_phone,
            booking.designer_name,
            booking.message,
            booking.created_at.format(DATE_TIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn list_bookings(
    conn: &Connection,
    calendar: CalendarId,
    range: DateRange,
) -> anyhow::Result<Vec<Booking>> {
    let (start, end) = range_bounds(range);
    let mut stmt = conn.prepare(
        "SELECT id, calendar, date, slot, client_name, client_phone, designer_name, message, created_at
         FROM bookings WHERE calendar = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC, created_at ASC",
    )?;

    let rows = stmt.query_map(params![calendar.as_str(), start, end], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, calendar, date, slot, client_name, client_phone, designer_name, message, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET date = ?1, slot = ?2, client_name = ?3, client_phone = ?4,
           designer_name = ?5, message = ?6
         WHERE id = ?7",
        params![
            booking.date.format(DATE_FORMAT).to_string(),
            booking.slot,
            booking.client_name,
            booking.client_phone,
            booking.designer_name,
            booking.message,
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let calendar_str: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(8)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATE_TIME_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id: row.get(0)?,
        calendar: parse_calendar(&calendar_str)?,
        date: parse_date(&date_str)?,
        slot: row.get(3)?,
        client_name: row.get(4)?,
        client_phone: row.get(5)?,
        designer_name: row.get(6)?,
        message: row.get(7)?,
        created_at,
    })
}

// ── Holidays ──

pub fn insert_holiday(conn: &Connection, holiday: &Holiday) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO holidays (id, calendar, date, description) VALUES (?1, ?2, ?3, ?4)",
        params![
            holiday.id,
            holiday.calendar.as_str(),
            holiday.date.format(DATE_FORMAT).to_string(),
            holiday.description,
        ],
    )?;
    Ok(())
}

pub fn list_holidays(
    conn: &Connection,
    calendar: CalendarId,
    range: DateRange,
) -> anyhow::Result<Vec<Holiday>> {
    let (start, end) = range_bounds(range);
    let mut stmt = conn.prepare(
        "SELECT id, calendar, date, description FROM holidays
         WHERE calendar = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date ASC",
    )?;

    let rows = stmt.query_map(params![calendar.as_str(), start, end], parse_holiday_row)?;

    let mut holidays = vec![];
    for row in rows {
        holidays.push(row?);
    }
    Ok(holidays)
}

pub fn get_holiday(conn: &Connection, id: &str) -> anyhow::Result<Option<Holiday>> {
    let result = conn.query_row(
        "SELECT id, calendar, date, description FROM holidays WHERE id = ?1",
        params![id],
        parse_holiday_row,
    );

    match result {
        Ok(holiday) => Ok(Some(holiday)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_holiday(conn: &Connection, holiday: &Holiday) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE holidays SET date = ?1, description = ?2 WHERE id = ?3",
        params![
            holiday.date.format(DATE_FORMAT).to_string(),
            holiday.description,
            holiday.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_holiday(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM holidays WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_holiday_row(row: &rusqlite::Row) -> rusqlite::Result<Holiday> {
    let calendar_str: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    Ok(Holiday {
        id: row.get(0)?,
        calendar: parse_calendar(&calendar_str)?,
        date: parse_date(&date_str)?,
        description: row.get(3)?,
    })
}

// ── Users ──

pub fn save_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, phone, role) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
           name = excluded.name,
           email = excluded.email,
           phone = excluded.phone,
           role = excluded.role",
        params![user.id, user.name, user.email, user.phone, user.role.as_str()],
    )?;
    Ok(())
}

pub fn list_users(conn: &Connection, role: Option<Role>) -> anyhow::Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, role FROM users
         WHERE ?1 IS NULL OR role = ?1 ORDER BY name ASC",
    )?;

    let rows = stmt.query_map(params![role.map(|r| r.as_str())], |row| {
        let role_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            role: Role::parse(&role_str).unwrap_or(Role::User),
        })
    })?;

    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}
