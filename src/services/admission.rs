use std::fmt;

use chrono::{Days, NaiveDate};

use crate::errors::AppError;
use crate::models::{
    Booking, BookingDetails, BookingPatch, CalendarId, Closed, DayFilter, NewBooking,
    OccupancyView, Slot,
};
use crate::services::clock::Clock;
use crate::services::duration::{expand_duration, WorkDays, MAX_LOOKAHEAD_DAYS};
use crate::services::occupancy::compute_occupancy;
use crate::store::{BookingStore, CachedStore, DateRange};

/// Why a booking request was turned down. Shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("{date} is a holiday on the {calendar} calendar")]
    Holiday { calendar: CalendarId, date: NaiveDate },

    #[error("{date} cannot be booked: {reason}")]
    Closed { date: NaiveDate, reason: Closed },

    #[error("the {slot} slot on {date} is already booked")]
    SlotTaken { date: NaiveDate, slot: Slot },

    #[error("{date} is fully booked ({capacity} bookings per day)")]
    CapacityReached { date: NaiveDate, capacity: usize },

    #[error("a time slot is required on the {calendar} calendar")]
    SlotRequired { calendar: CalendarId },

    #[error("\"{label}\" is not a slot of the {calendar} calendar")]
    UnknownSlot { calendar: CalendarId, label: String },

    #[error("the {calendar} calendar does not take multi-day bookings")]
    DurationNotSupported { calendar: CalendarId },

    #[error("no working day follows {date} within two weeks")]
    NoFollowingDay { date: NaiveDate },
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Holiday { .. } => "holiday",
            Rejection::Closed { .. } => "closed",
            Rejection::SlotTaken { .. } => "slot_taken",
            Rejection::CapacityReached { .. } => "capacity_reached",
            Rejection::SlotRequired { .. } => "slot_required",
            Rejection::UnknownSlot { .. } => "unknown_slot",
            Rejection::DurationNotSupported { .. } => "duration_not_supported",
            Rejection::NoFollowingDay { .. } => "no_following_day",
        }
    }

    /// The request itself was wrong, as opposed to the calendar being unavailable.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Rejection::SlotRequired { .. }
                | Rejection::UnknownSlot { .. }
                | Rejection::DurationNotSupported { .. }
        )
    }
}

/// What stopped a multi-day batch after some days were already booked.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchFailure {
    Rejected(Rejection),
    Store(String),
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFailure::Rejected(r) => write!(f, "{r}"),
            BatchFailure::Store(e) => write!(f, "booking store error: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdmissionResult {
    Admitted(Vec<Booking>),
    Rejected(Rejection),
    /// Earlier days stay booked; nothing is rolled back.
    PartialBatch {
        created: Vec<Booking>,
        failed_on: NaiveDate,
        cause: BatchFailure,
    },
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub calendar: CalendarId,
    pub date: NaiveDate,
    pub slot: Option<String>,
    pub duration: WorkDays,
    pub details: BookingDetails,
}

/// Apply the admission rules for one day against the bookings already on it.
///
/// Order: holiday, closed day, then slot conflict (slot calendars) or capacity (date-only).
pub fn check_admission(
    calendar: CalendarId,
    date: NaiveDate,
    slot: Option<&str>,
    filter: &DayFilter,
    existing: &OccupancyView,
) -> Result<Slot, Rejection> {
    if filter.is_holiday(date) {
        return Err(Rejection::Holiday { calendar, date });
    }
    if let Err(reason) = filter.check(date) {
        return Err(Rejection::Closed { date, reason });
    }

    let rules = calendar.rules();
    let label = slot.map(str::trim).filter(|s| !s.is_empty());

    if rules.uses_time_slots {
        let label = label.ok_or(Rejection::SlotRequired { calendar })?;
        let slot = Slot::parse(calendar, label).ok_or_else(|| Rejection::UnknownSlot {
            calendar,
            label: label.to_string(),
        })?;
        if existing.is_slot_taken(date, slot) {
            return Err(Rejection::SlotTaken { date, slot });
        }
        Ok(slot)
    } else {
        let slot = match label {
            Some(label) => Slot::parse(calendar, label).ok_or_else(|| Rejection::UnknownSlot {
                calendar,
                label: label.to_string(),
            })?,
            None => Slot::FullDay,
        };
        if existing.count(date) >= rules.max_bookings_per_day {
            return Err(Rejection::CapacityReached {
                date,
                capacity: rules.max_bookings_per_day,
            });
        }
        Ok(slot)
    }
}

/// The write path: validates each day against fresh store data, then persists.
pub struct Admission<'a> {
    store: &'a CachedStore,
    clock: &'a dyn Clock,
}

impl<'a> Admission<'a> {
    pub fn new(store: &'a CachedStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    async fn day_filter(&self, calendar: CalendarId, from: NaiveDate) -> Result<DayFilter, AppError> {
        // Wide enough for the longest duration expansion
        let horizon = from
            .checked_add_days(Days::new(MAX_LOOKAHEAD_DAYS * 2))
            .unwrap_or(from);
        let holidays = self
            .store
            .inner()
            .list_holidays(calendar, DateRange::between(from, horizon))
            .await?;
        Ok(DayFilter::from_holidays(calendar, self.clock.today(), &holidays))
    }

    async fn occupancy_on(
        &self,
        calendar: CalendarId,
        date: NaiveDate,
        exclude: Option<&str>,
    ) -> Result<OccupancyView, AppError> {
        let mut existing = self
            .store
            .inner()
            .list_bookings(calendar, DateRange::day(date))
            .await?;
        if let Some(id) = exclude {
            existing.retain(|b| b.id != id);
        }
        Ok(compute_occupancy(calendar, &existing, self.clock.today()))
    }

    async fn admit_day(
        &self,
        calendar: CalendarId,
        date: NaiveDate,
        slot: Option<&str>,
        details: &BookingDetails,
        filter: &DayFilter,
    ) -> Result<Booking, AppError> {
        let existing = self.occupancy_on(calendar, date, None).await?;
        let slot = check_admission(calendar, date, slot, filter, &existing).inspect_err(|r| {
            tracing::info!(calendar = %calendar, date = %date, reason = r.code(), "booking rejected");
        })?;

        let booking = self
            .store
            .create_booking(&NewBooking {
                calendar,
                date,
                slot,
                details: details.clone(),
            })
            .await?;

        tracing::info!(
            calendar = %calendar,
            date = %date,
            slot = %slot,
            booking_id = %booking.id,
            "booking admitted"
        );
        Ok(booking)
    }

    /// Admit a request, creating one booking per day it covers.
    ///
    /// Days are booked one after the other. A failure on the first day leaves nothing behind
    /// (`Rejected`, or `Err` for store failures); a failure on a later day reports the bookings
    /// already made as a `PartialBatch`.
    pub async fn admit(&self, request: &BookingRequest) -> Result<AdmissionResult, AppError> {
        let calendar = request.calendar;
        if request.duration > WorkDays::One && !calendar.supports_duration() {
            return Ok(AdmissionResult::Rejected(Rejection::DurationNotSupported {
                calendar,
            }));
        }

        let filter = self.day_filter(calendar, request.date).await?;
        let dates = match expand_duration(request.date, request.duration, &filter) {
            Some(dates) => dates,
            None => {
                return Ok(AdmissionResult::Rejected(Rejection::NoFollowingDay {
                    date: request.date,
                }))
            }
        };

        let mut created = Vec::with_capacity(dates.len());
        for date in dates {
            let outcome = self
                .admit_day(
                    calendar,
                    date,
                    request.slot.as_deref(),
                    &request.details,
                    &filter,
                )
                .await;

            let cause = match outcome {
                Ok(booking) => {
                    created.push(booking);
                    continue;
                }
                Err(AppError::Rejected(rejection)) if created.is_empty() => {
                    return Ok(AdmissionResult::Rejected(rejection));
                }
                Err(e) if created.is_empty() => return Err(e),
                Err(AppError::Rejected(rejection)) => BatchFailure::Rejected(rejection),
                Err(AppError::Store(e)) => BatchFailure::Store(format!("{e:#}")),
                Err(e) => BatchFailure::Store(e.to_string()),
            };

            tracing::warn!(
                calendar = %calendar,
                failed_on = %date,
                created = created.len(),
                cause = %cause,
                "multi-day booking only partially created"
            );
            return Ok(AdmissionResult::PartialBatch {
                created,
                failed_on: date,
                cause,
            });
        }

        Ok(AdmissionResult::Admitted(created))
    }

    /// Check that moving `booking` as `patch` describes would be admitted, returning the slot it
    /// would land in. The booking itself does not count against its new day.
    pub async fn check_move(
        &self,
        booking: &Booking,
        patch: &BookingPatch,
    ) -> Result<Option<Slot>, AppError> {
        if !patch.moves_booking() {
            return Ok(None);
        }
        let calendar = booking.calendar;
        let date = patch.date.unwrap_or(booking.date);
        let slot = patch.slot.as_deref().unwrap_or(&booking.slot);

        let filter = self.day_filter(calendar, date).await?;
        let existing = self.occupancy_on(calendar, date, Some(&booking.id)).await?;
        let slot = check_admission(calendar, date, Some(slot), &filter, &existing).inspect_err(|r| {
            tracing::info!(booking_id = %booking.id, date = %date, reason = r.code(), "move rejected");
        })?;
        Ok(Some(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetreSlot, SavSlot};
    use chrono::NaiveDateTime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: &str, calendar: CalendarId, date: &str, slot: &str) -> Booking {
        Booking {
            id: id.to_string(),
            calendar,
            date: d(date),
            slot: slot.to_string(),
            client_name: "Martin".to_string(),
            client_phone: "0601020304".to_string(),
            designer_name: "Claire".to_string(),
            message: None,
            created_at: NaiveDateTime::parse_from_str("2025-11-01 08:00", "%Y-%m-%d %H:%M")
                .unwrap(),
        }
    }

    fn filter(calendar: CalendarId) -> DayFilter {
        DayFilter::new(calendar, d("2025-11-17"), [d("2025-11-20")])
    }

    fn view(calendar: CalendarId, bookings: &[Booking]) -> OccupancyView {
        compute_occupancy(calendar, bookings, d("2025-11-17"))
    }

    #[test]
    fn test_holiday_checked_first() {
        // 2025-11-20 is both a holiday and has no room; the holiday wins
        let existing = view(
            CalendarId::Pose,
            &[
                booking("1", CalendarId::Pose, "2025-11-20", "journee"),
                booking("2", CalendarId::Pose, "2025-11-20", "journee"),
            ],
        );
        let result = check_admission(
            CalendarId::Pose,
            d("2025-11-20"),
            None,
            &filter(CalendarId::Pose),
            &existing,
        );
        assert_eq!(
            result,
            Err(Rejection::Holiday {
                calendar: CalendarId::Pose,
                date: d("2025-11-20")
            })
        );
    }

    #[test]
    fn test_sunday_and_past_are_closed() {
        let existing = view(CalendarId::Sav, &[]);
        let f = filter(CalendarId::Sav);
        assert_eq!(
            check_admission(CalendarId::Sav, d("2025-11-23"), Some("8:00-11:00"), &f, &existing),
            Err(Rejection::Closed {
                date: d("2025-11-23"),
                reason: Closed::Sunday
            })
        );
        assert_eq!(
            check_admission(CalendarId::Sav, d("2025-11-14"), Some("8:00-11:00"), &f, &existing),
            Err(Rejection::Closed {
                date: d("2025-11-14"),
                reason: Closed::Past
            })
        );
    }

    #[test]
    fn test_capacity_on_date_only_calendar() {
        let f = filter(CalendarId::Pose);
        let one = view(
            CalendarId::Pose,
            &[booking("1", CalendarId::Pose, "2025-11-18", "journee")],
        );
        assert_eq!(
            check_admission(CalendarId::Pose, d("2025-11-18"), None, &f, &one),
            Ok(Slot::FullDay)
        );

        let two = view(
            CalendarId::Pose,
            &[
                booking("1", CalendarId::Pose, "2025-11-18", "journee"),
                booking("2", CalendarId::Pose, "2025-11-18", "journee"),
            ],
        );
        assert_eq!(
            check_admission(CalendarId::Pose, d("2025-11-18"), None, &f, &two),
            Err(Rejection::CapacityReached {
                date: d("2025-11-18"),
                capacity: 2
            })
        );
    }

    #[test]
    fn test_past_bookings_do_not_use_capacity() {
        let f = filter(CalendarId::Pose);
        let existing = view(
            CalendarId::Pose,
            &[
                booking("1", CalendarId::Pose, "2025-11-16", "journee"),
                booking("2", CalendarId::Pose, "2025-11-16", "journee"),
            ],
        );
        assert!(check_admission(CalendarId::Pose, d("2025-11-18"), None, &f, &existing).is_ok());
    }

    #[test]
    fn test_slot_conflict_ignores_case_and_whitespace() {
        let f = filter(CalendarId::Metre);
        let existing = view(
            CalendarId::Metre,
            &[booking("1", CalendarId::Metre, "2025-11-18", "9h00")],
        );
        assert_eq!(
            check_admission(CalendarId::Metre, d("2025-11-18"), Some(" 9H00 "), &f, &existing),
            Err(Rejection::SlotTaken {
                date: d("2025-11-18"),
                slot: Slot::Metre(MetreSlot::H9)
            })
        );
        assert_eq!(
            check_admission(CalendarId::Metre, d("2025-11-18"), Some("10h00"), &f, &existing),
            Ok(Slot::Metre(MetreSlot::H10))
        );
    }

    #[test]
    fn test_slot_calendar_requires_a_slot() {
        let f = filter(CalendarId::Sav);
        let existing = view(CalendarId::Sav, &[]);
        assert_eq!(
            check_admission(CalendarId::Sav, d("2025-11-18"), None, &f, &existing),
            Err(Rejection::SlotRequired {
                calendar: CalendarId::Sav
            })
        );
        assert_eq!(
            check_admission(CalendarId::Sav, d("2025-11-18"), Some("  "), &f, &existing),
            Err(Rejection::SlotRequired {
                calendar: CalendarId::Sav
            })
        );
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let f = filter(CalendarId::Sav);
        let existing = view(CalendarId::Sav, &[]);
        let result = check_admission(CalendarId::Sav, d("2025-11-18"), Some("9h00"), &f, &existing);
        assert!(matches!(result, Err(Rejection::UnknownSlot { .. })));
        assert!(result.unwrap_err().is_malformed());
        assert_eq!(
            check_admission(CalendarId::Sav, d("2025-11-18"), Some("11:00-14:00"), &f, &existing),
            Ok(Slot::Sav(SavSlot::Midday))
        );
    }

    #[test]
    fn test_rejection_messages() {
        let rejection = Rejection::CapacityReached {
            date: d("2025-11-18"),
            capacity: 2,
        };
        assert_eq!(
            rejection.to_string(),
            "2025-11-18 is fully booked (2 bookings per day)"
        );
        assert_eq!(rejection.code(), "capacity_reached");
        assert!(!rejection.is_malformed());
    }
}
