use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::{CalendarId, Holiday};

/// Why a day cannot take bookings, regardless of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Closed {
    Past,
    Sunday,
    Holiday,
    /// Occupancy has not been computed yet.
    Loading,
}

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Closed::Past => "the date is in the past",
            Closed::Sunday => "no bookings on Sundays",
            Closed::Holiday => "the date is a holiday",
            Closed::Loading => "availability is still loading",
        };
        f.write_str(s)
    }
}

/// Bookability of calendar days for one calendar, as of `today`.
#[derive(Debug, Clone)]
pub struct DayFilter {
    calendar: CalendarId,
    today: NaiveDate,
    holidays: BTreeSet<NaiveDate>,
}

impl DayFilter {
    pub fn new(
        calendar: CalendarId,
        today: NaiveDate,
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            calendar,
            today,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Holidays declared for other calendars are ignored.
    pub fn from_holidays(calendar: CalendarId, today: NaiveDate, holidays: &[Holiday]) -> Self {
        Self::new(
            calendar,
            today,
            holidays
                .iter()
                .filter(|h| h.calendar == calendar)
                .map(|h| h.date),
        )
    }

    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// A working day: neither a Sunday nor a holiday. Does not look at `today`.
    pub fn is_valid_day(&self, date: NaiveDate) -> bool {
        date.weekday() != Weekday::Sun && !self.is_holiday(date)
    }

    pub fn check(&self, date: NaiveDate) -> Result<(), Closed> {
        if date < self.today {
            return Err(Closed::Past);
        }
        if date.weekday() == Weekday::Sun {
            return Err(Closed::Sunday);
        }
        if self.is_holiday(date) {
            return Err(Closed::Holiday);
        }
        Ok(())
    }

    pub fn is_bookable(&self, date: NaiveDate) -> bool {
        self.check(date).is_ok()
    }
}
