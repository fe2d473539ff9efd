use std::fmt;

use serde::{Deserialize, Serialize};

use super::slot::{MetreSlot, SavSlot, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarId {
    /// Site visits.
    Metre,
    /// Installations. Books whole days.
    Pose,
    /// After-service.
    Sav,
}

pub const ALL_CALENDARS: [CalendarId; 3] = [CalendarId::Metre, CalendarId::Pose, CalendarId::Sav];

#[derive(Debug, Clone, Serialize)]
pub struct CalendarRules {
    pub id: CalendarId,
    pub max_bookings_per_day: usize,
    pub uses_time_slots: bool,
    pub slot_catalog: &'static [Slot],
}

static METRE_SLOTS: [Slot; 8] = [
    Slot::Metre(MetreSlot::H8),
    Slot::Metre(MetreSlot::H9),
    Slot::Metre(MetreSlot::H10),
    Slot::Metre(MetreSlot::H11),
    Slot::Metre(MetreSlot::H13),
    Slot::Metre(MetreSlot::H14),
    Slot::Metre(MetreSlot::H15),
    Slot::Metre(MetreSlot::H16),
];

static SAV_SLOTS: [Slot; 3] = [
    Slot::Sav(SavSlot::Morning),
    Slot::Sav(SavSlot::Midday),
    Slot::Sav(SavSlot::Afternoon),
];

static METRE: CalendarRules = CalendarRules {
    id: CalendarId::Metre,
    max_bookings_per_day: 8,
    uses_time_slots: true,
    slot_catalog: &METRE_SLOTS,
};

static POSE: CalendarRules = CalendarRules {
    id: CalendarId::Pose,
    max_bookings_per_day: 2,
    uses_time_slots: false,
    slot_catalog: &[],
};

static SAV: CalendarRules = CalendarRules {
    id: CalendarId::Sav,
    max_bookings_per_day: 3,
    uses_time_slots: true,
    slot_catalog: &SAV_SLOTS,
};

impl CalendarId {
    pub fn rules(&self) -> &'static CalendarRules {
        match self {
            CalendarId::Metre => &METRE,
            CalendarId::Pose => &POSE,
            CalendarId::Sav => &SAV,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarId::Metre => "metre",
            CalendarId::Pose => "pose",
            CalendarId::Sav => "sav",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metre" | "métré" | "metré" => Some(CalendarId::Metre),
            "pose" => Some(CalendarId::Pose),
            "sav" => Some(CalendarId::Sav),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CalendarId::Metre => "Métré",
            CalendarId::Pose => "Pose",
            CalendarId::Sav => "SAV",
        }
    }

    /// Only the installation calendar accepts multi-day requests.
    pub fn supports_duration(&self) -> bool {
        !self.rules().uses_time_slots
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
