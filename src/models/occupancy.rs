use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::{Booking, CalendarId, Closed, DayFilter, Slot};

#[derive(Debug, Clone, Default)]
pub struct DayOccupancy {
    pub(crate) bookings: usize,
    pub(crate) slots: BTreeMap<Slot, Booking>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayStatus {
    Disabled { reason: Closed },
    FullyBooked { count: usize, capacity: usize },
    Available { count: usize, capacity: usize },
}

impl DayStatus {
    /// Fully booked days cannot be picked either; they are only displayed differently.
    pub fn is_disabled(&self) -> bool {
        !matches!(self, DayStatus::Available { .. })
    }
}

/// Per-day (and per-slot, for slot calendars) booking counts for one calendar.
#[derive(Debug, Clone)]
pub struct OccupancyView {
    pub(crate) calendar: CalendarId,
    pub(crate) loaded: bool,
    pub(crate) days: BTreeMap<NaiveDate, DayOccupancy>,
}

impl OccupancyView {
    /// A view that has not seen any data yet. Every day reads as disabled.
    pub fn pending(calendar: CalendarId) -> Self {
        Self {
            calendar,
            loaded: false,
            days: BTreeMap::new(),
        }
    }

    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn capacity(&self) -> usize {
        self.calendar.rules().max_bookings_per_day
    }

    /// Bookings on `date`; distinct occupied slots for slot calendars.
    pub fn count(&self, date: NaiveDate) -> usize {
        match self.days.get(&date) {
            Some(day) if self.calendar.rules().uses_time_slots => day.slots.len(),
            Some(day) => day.bookings,
            None => 0,
        }
    }

    pub fn is_full(&self, date: NaiveDate) -> bool {
        self.count(date) >= self.capacity()
    }

    pub fn slot_booking(&self, date: NaiveDate, slot: Slot) -> Option<&Booking> {
        self.days.get(&date).and_then(|day| day.slots.get(&slot))
    }

    pub fn is_slot_taken(&self, date: NaiveDate, slot: Slot) -> bool {
        self.slot_booking(date, slot).is_some()
    }

    pub fn free_slots(&self, date: NaiveDate) -> Vec<Slot> {
        self.calendar
            .rules()
            .slot_catalog
            .iter()
            .filter(|slot| !self.is_slot_taken(date, **slot))
            .copied()
            .collect()
    }

    pub fn day_status(&self, date: NaiveDate, filter: &DayFilter) -> DayStatus {
        if let Err(reason) = filter.check(date) {
            return DayStatus::Disabled { reason };
        }
        if !self.loaded {
            return DayStatus::Disabled {
                reason: Closed::Loading,
            };
        }
        let count = self.count(date);
        let capacity = self.capacity();
        if count >= capacity {
            DayStatus::FullyBooked { count, capacity }
        } else {
            DayStatus::Available { count, capacity }
        }
    }
}
