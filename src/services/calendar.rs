use chrono::Days;

use crate::models::Booking;

/// An all-day iCalendar event for `booking`. Slot labels are not times, so they go in the summary.
pub fn generate_ics(booking: &Booking, company_name: &str) -> String {
    let dtstart = booking.date.format("%Y%m%d").to_string();
    let dtend = booking
        .date
        .checked_add_days(Days::new(1))
        .unwrap_or(booking.date)
        .format("%Y%m%d")
        .to_string();
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@agenda", booking.id);

    let calendar = booking.calendar.display_name();
    let summary = match booking.slot() {
        Some(slot) if booking.calendar.rules().uses_time_slots => {
            format!("{calendar} {} - {}", slot, booking.client_name)
        }
        _ => format!("{calendar} - {}", booking.client_name),
    };
    let description = booking
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("No additional notes");

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//{company_name}//Agenda//FR\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART;VALUE=DATE:{dtstart}\r\n\
         DTEND;VALUE=DATE:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}
