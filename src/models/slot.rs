use std::fmt;

use serde::{Serialize, Serializer};

use super::calendar::CalendarId;

/// Label stored for bookings on the date-only calendar.
pub const FULL_DAY_LABEL: &str = "journee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetreSlot {
    H8,
    H9,
    H10,
    H11,
    H13,
    H14,
    H15,
    H16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SavSlot {
    Morning,
    Midday,
    Afternoon,
}

/// A bookable unit of a day, scoped to the calendar that defines it.
///
/// On the wire a slot is its label (`"9h00"`, `"8:00-11:00"`, `"journee"`); inside the engine it
/// is always one of the catalog variants, so two labels that only differ in case or surrounding
/// whitespace map to the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Metre(MetreSlot),
    Sav(SavSlot),
    FullDay,
}

impl Slot {
    pub fn label(&self) -> &'static str {
        match self {
            Slot::Metre(s) => match s {
                MetreSlot::H8 => "8h00",
                MetreSlot::H9 => "9h00",
                MetreSlot::H10 => "10h00",
                MetreSlot::H11 => "11h00",
                MetreSlot::H13 => "13h00",
                MetreSlot::H14 => "14h00",
                MetreSlot::H15 => "15h00",
                MetreSlot::H16 => "16h00",
            },
            Slot::Sav(s) => match s {
                SavSlot::Morning => "8:00-11:00",
                SavSlot::Midday => "11:00-14:00",
                SavSlot::Afternoon => "14:00-17:00",
            },
            Slot::FullDay => FULL_DAY_LABEL,
        }
    }

    pub fn calendar(&self) -> CalendarId {
        match self {
            Slot::Metre(_) => CalendarId::Metre,
            Slot::Sav(_) => CalendarId::Sav,
            Slot::FullDay => CalendarId::Pose,
        }
    }

    /// Map a wire label onto the calendar's catalog.
    pub fn parse(calendar: CalendarId, raw: &str) -> Option<Slot> {
        let normalized = normalize_label(raw);
        let rules = calendar.rules();
        if !rules.uses_time_slots {
            return (normalized.is_empty() || normalized == FULL_DAY_LABEL).then_some(Slot::FullDay);
        }
        rules
            .slot_catalog
            .iter()
            .find(|slot| slot.label().to_lowercase() == normalized)
            .copied()
    }
}

pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
