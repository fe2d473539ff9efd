use chrono::NaiveDate;

use crate::models::{Booking, CalendarId, DayOccupancy, OccupancyView};

/// Aggregate a calendar's bookings into per-day occupancy.
///
/// Bookings dated before `today` never count. On slot calendars a later booking for an
/// already-occupied slot replaces the earlier one in the view; labels outside the catalog are
/// skipped.
pub fn compute_occupancy(
    calendar: CalendarId,
    bookings: &[Booking],
    today: NaiveDate,
) -> OccupancyView {
    let mut view = OccupancyView::pending(calendar);
    let uses_slots = calendar.rules().uses_time_slots;

    for booking in bookings {
        if booking.calendar != calendar || booking.date < today {
            continue;
        }

        if uses_slots {
            let Some(slot) = booking.slot() else {
                tracing::warn!(
                    calendar = %calendar,
                    booking_id = %booking.id,
                    slot = %booking.slot,
                    "booking has a slot outside the calendar catalog"
                );
                continue;
            };
            let day = view.days.entry(booking.date).or_insert_with(DayOccupancy::default);
            day.bookings += 1;
            if day.slots.insert(slot, booking.clone()).is_some() {
                tracing::warn!(
                    calendar = %calendar,
                    date = %booking.date,
                    slot = %slot,
                    "slot booked more than once"
                );
            }
        } else {
            view.days.entry(booking.date).or_default().bookings += 1;
        }
    }

    view.loaded = true;
    view
}
