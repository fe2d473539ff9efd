use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{CalendarId, Slot};

/// A booking as exchanged with the store. `slot` keeps the raw wire label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub calendar: CalendarId,
    pub date: NaiveDate,
    pub slot: String,
    pub client_name: String,
    pub client_phone: String,
    pub designer_name: String,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Booking {
    /// The catalog slot for this booking, if its label is one the calendar knows.
    pub fn slot(&self) -> Option<Slot> {
        Slot::parse(self.calendar, &self.slot)
    }

    /// Strip client detail for actors who may see the booking but not who it is for.
    pub fn redacted(&self) -> Booking {
        Booking {
            client_name: String::new(),
            client_phone: String::new(),
            message: None,
            ..self.clone()
        }
    }
}

/// Client/designer details shared by every booking a request produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BookingDetails {
    pub client_name: String,
    pub client_phone: String,
    pub designer_name: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub calendar: CalendarId,
    pub date: NaiveDate,
    pub slot: Slot,
    #[serde(flatten)]
    pub details: BookingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingPatch {
    pub fn moves_booking(&self) -> bool {
        self.date.is_some() || self.slot.is_some()
    }

    pub fn apply(&self, booking: &mut Booking) {
        if let Some(date) = self.date {
            booking.date = date;
        }
        if let Some(slot) = &self.slot {
            booking.slot = slot.clone();
        }
        if let Some(name) = &self.client_name {
            booking.client_name = name.clone();
        }
        if let Some(phone) = &self.client_phone {
            booking.client_phone = phone.clone();
        }
        if let Some(designer) = &self.designer_name {
            booking.designer_name = designer.clone();
        }
        if let Some(message) = &self.message {
            booking.message = Some(message.clone());
        }
    }
}
