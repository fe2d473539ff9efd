pub mod availability;
pub mod booking;
pub mod calendar;
pub mod holiday;
pub mod occupancy;
pub mod slot;
pub mod user;

pub use availability::{Closed, DayFilter};
pub use booking::{Booking, BookingDetails, BookingPatch, NewBooking};
pub use calendar::{CalendarId, CalendarRules, ALL_CALENDARS};
pub use holiday::{Holiday, HolidayPatch, NewHoliday};
pub use occupancy::{DayOccupancy, DayStatus, OccupancyView};
pub use slot::{MetreSlot, SavSlot, Slot, FULL_DAY_LABEL};
pub use user::{Actor, NewUser, Role, User};
